use swiftclaim_common::ClaimState;

/// Which screen the app is showing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum View {
    #[default]
    Dashboard,
    Preview,
}

#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub claim: ClaimState,
    pub view: View,
    pub selected_id: Option<String>,
    pub dirty: bool,
}

impl AppState {
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}
