//! Hop-2 probes: accept a bare username or a `{platform, username}` pair.

mod code_host_profile;
mod platform_checker;
mod secret_scanner;
mod social_deep;
mod wayback;

pub use code_host_profile::CodeHostProfileProbe;
pub use platform_checker::PlatformExistenceProbe;
pub use secret_scanner::CodeHostSecretScannerProbe;
pub use social_deep::SocialDeepDiveProbe;
pub use wayback::WebArchiveProbe;
