/// Default configuration file looked up in the working directory
pub const CONFIG_FILE: &str = "cos-deployer.json";

/// Default publish directory (Hexo's `public_dir`)
pub const DEFAULT_PUBLIC_DIR: &str = "public";

/// Default number of uploads in flight at once
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Maximum number of keys a single delete-many request may carry
pub const DELETE_BATCH_CAP: usize = 1000;

/// Current deployer version
pub const DEPLOYER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// COS S3-compatible endpoint for a region
pub fn cos_endpoint(region: &str) -> String {
    format!("https://cos.{region}.myqcloud.com")
}
