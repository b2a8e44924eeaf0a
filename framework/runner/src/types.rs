/// Recommended error type for a scenario `main` function and any shared hook code. This type is
/// compatible with [crate::definition::HookResult] so `?` propagates cleanly.
pub type StressResult<T> = anyhow::Result<T>;
