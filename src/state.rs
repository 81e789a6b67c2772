/// Application state
pub struct AppState {
    /// Current rotation angle of the globe scene
    pub angle: f64,
    /// Simulation paused
    pub paused: bool,
    /// Enable the debug status line
    pub debug: bool,
    /// Ornament coloring pass enabled; toggling regenerates the scene
    pub show_decorations: bool,
}
