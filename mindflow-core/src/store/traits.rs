/// Durable key-value storage for serialized store state.
///
/// Backends hold opaque string values; the store decides what goes in them.
/// Calls are synchronous and complete before the triggering mutation returns.
pub trait StateStorage: std::fmt::Debug {
    /// Read the value stored under `key`, if any.
    fn load(&self, key: &str) -> crate::error::Result<Option<String>>;

    /// Insert or overwrite the value under `key`.
    fn save(&self, key: &str, value: &str) -> crate::error::Result<()>;

    /// Delete the value under `key`. Missing keys are not an error.
    fn remove(&self, key: &str) -> crate::error::Result<()>;
}
