//! CLI mode
//!
//! 不需要启动服务器的命令。

use anyhow::{Context, Result};

use crate::config::StaticConfig;

/// 输出示例配置；指定 `output` 时写入文件
pub fn generate_config(output: Option<&str>) -> Result<()> {
    let sample = StaticConfig::generate_sample_config();
    match output {
        Some(path) => {
            std::fs::write(path, &sample)
                .with_context(|| format!("Failed to write sample config to '{}'", path))?;
            println!("Sample configuration written to {}", path);
        }
        None => print!("{}", sample),
    }
    Ok(())
}
