use std::sync::Arc;

use crate::config::Config;
use crate::email::Dispatcher;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: Config,
    /// `None` when the selected mail driver could not be built; submissions
    /// then fail with a configuration error before any network attempt.
    pub dispatcher: Option<Dispatcher>,
}
