use serde::{Deserialize, Serialize};

/// Prefix joined with a binding identifier to form its store key.
pub const DEFAULT_STORAGE_PREFIX: &str = "keybind-";

/// Action group passed to the native suppression call.
pub const DEFAULT_SUPPRESS_GROUP: u32 = 0;

/// Control disabled while a modifier is held (the character wheel, bound to alt).
pub const DEFAULT_SUPPRESS_CONTROL: u32 = 19;

/// Dispatch slower than this is logged at warn level.
pub const DEFAULT_SLOW_DISPATCH_WARN_MS: u64 = 5;

/// A native control to disable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeControl {
    /// Action group id.
    pub group: u32,
    /// Control id within the group.
    pub control: u32,
}

/// Engine tuning. Every field has a default, so an empty config is valid.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Store key prefix for persisted remaps.
    pub storage_prefix: String,
    /// Native control disabled on every tick a modifier is held; `None` disables suppression.
    pub suppress_on_modifier: Option<NativeControl>,
    /// Warn threshold for a single key event or tick.
    pub slow_dispatch_warn_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            storage_prefix: DEFAULT_STORAGE_PREFIX.to_string(),
            suppress_on_modifier: Some(NativeControl {
                group: DEFAULT_SUPPRESS_GROUP,
                control: DEFAULT_SUPPRESS_CONTROL,
            }),
            slow_dispatch_warn_ms: DEFAULT_SLOW_DISPATCH_WARN_MS,
        }
    }
}

impl EngineConfig {
    /// Store key for `identifier`.
    pub fn storage_key(&self, identifier: &str) -> String {
        format!("{}{}", self.storage_prefix, identifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let cfg: EngineConfig = ron::from_str("()").unwrap();
        assert_eq!(cfg, EngineConfig::default());
        assert_eq!(cfg.storage_key("phone"), "keybind-phone");
    }

    #[test]
    fn partial_override() {
        let cfg: EngineConfig =
            ron::from_str("(storage_prefix: \"kb.\", suppress_on_modifier: None)").unwrap();
        assert_eq!(cfg.storage_key("phone"), "kb.phone");
        assert_eq!(cfg.suppress_on_modifier, None);
        assert_eq!(cfg.slow_dispatch_warn_ms, DEFAULT_SLOW_DISPATCH_WARN_MS);
    }

    #[test]
    fn unknown_fields_rejected() {
        assert!(ron::from_str::<EngineConfig>("(prefix: \"x\")").is_err());
    }
}
