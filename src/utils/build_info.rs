/// Compile-time build metadata produced by `build.rs`.
#[derive(Debug, Clone, Copy)]
pub struct BuildMetadata {
    pub version: &'static str,
    pub git_hash: &'static str,
    pub git_status: &'static str,
    pub timestamp: &'static str,
    pub target: &'static str,
    pub profile: &'static str,
    pub rustc: &'static str,
}

impl BuildMetadata {
    /// One-line summary, e.g. `0.1.0 (abc1234, clean)`.
    pub fn short(&self) -> String {
        format!("{} ({}, {})", self.version, self.git_hash, self.git_status)
    }
}

pub fn current() -> BuildMetadata {
    BuildMetadata {
        version: env!("CARGO_PKG_VERSION"),
        git_hash: option_env!("RENTMATE_BUILD_HASH").unwrap_or("unknown"),
        git_status: option_env!("RENTMATE_BUILD_STATUS").unwrap_or("unknown"),
        timestamp: option_env!("RENTMATE_BUILD_TIMESTAMP").unwrap_or("unknown"),
        target: option_env!("RENTMATE_BUILD_TARGET").unwrap_or("unknown"),
        profile: option_env!("RENTMATE_BUILD_PROFILE").unwrap_or("unknown"),
        rustc: option_env!("RENTMATE_BUILD_RUSTC").unwrap_or("unknown"),
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn version_matches_package() {
        let meta = super::current();
        assert_eq!(meta.version, env!("CARGO_PKG_VERSION"));
        assert!(meta.short().starts_with(meta.version));
    }
}
