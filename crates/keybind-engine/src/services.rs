use std::sync::Arc;

use keystore::KeyStore;

use crate::deps::{Clock, InputSource, MenuQuery, NativeControls, PlayerState};

/// Groups the host collaborators the engine consumes so that construction sites
/// name every dependency explicitly.
#[derive(Clone)]
pub struct Services {
    /// Physical key state.
    pub input: Arc<dyn InputSource>,
    /// Menu page state.
    pub menus: Arc<dyn MenuQuery>,
    /// Player snapshot provider.
    pub player: Arc<dyn PlayerState>,
    /// Native control suppression.
    pub natives: Arc<dyn NativeControls>,
    /// Remap persistence.
    pub store: Arc<dyn KeyStore>,
    /// Time source for cooldowns and delayed triggers.
    pub clock: Arc<dyn Clock>,
}
