//! sitecfg: resolve site- and environment-specific build configs
//!
//! Prints the resolved config or keeps `config.lock` in sync with it.

use anyhow::Result;

fn main() -> Result<()> {
    sitecfg::cli::run()
}
