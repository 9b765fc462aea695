mod app;
mod io;
mod model;

use app::ClaimApp;

fn main() -> eframe::Result<()> {
    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "SwiftClaim",
        options,
        Box::new(|_cc| Box::new(ClaimApp::default())),
    )
}
