//! 配置系统
//!
//! 提供发射器配置的 TOML 读写。配置文件是普通的键值表，关键帧列表
//! 用数组表示：
//!
//! ```toml
//! emission_rate = 60.0
//! particle_life_min = 0.6
//! particle_life_max = 1.4
//! sizes = [1.0, 1.4, 0.3]
//! colors = [[1.0, 0.85, 0.25, 1.0], [0.35, 0.08, 0.02, 0.0]]
//! ```

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::render::particles::EmitterConfig;

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 文件读取错误
    #[error("Config file error: {0}")]
    FileError(#[from] std::io::Error),

    /// 解析错误
    #[error("Config parse error: {0}")]
    ParseError(String),

    /// 验证错误
    #[error("Config validation error: {0}")]
    ValidationError(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// 从 TOML 文件加载发射器配置
pub fn load_emitter_config<P: AsRef<Path>>(path: P) -> ConfigResult<EmitterConfig> {
    let content = fs::read_to_string(path)?;
    parse_emitter_config(&content)
}

/// 从 TOML 文本解析发射器配置
///
/// 缺省字段取默认值；解析成功后还会做参数校验（速率非负、关键帧
/// 列表非空）。
pub fn parse_emitter_config(content: &str) -> ConfigResult<EmitterConfig> {
    let config: EmitterConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    config
        .validate()
        .map_err(|e| ConfigError::ValidationError(e.to_string()))?;
    Ok(config)
}

/// 把发射器配置序列化为 TOML 文本
pub fn emitter_config_to_toml(config: &EmitterConfig) -> ConfigResult<String> {
    toml::to_string_pretty(config).map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// 把发射器配置保存到 TOML 文件
pub fn save_emitter_config<P: AsRef<Path>>(config: &EmitterConfig, path: P) -> ConfigResult<()> {
    let content = emitter_config_to_toml(config)?;
    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::particles::EffectPreset;

    #[test]
    fn test_toml_round_trip() {
        let config = EffectPreset::Fire.config();
        let text = emitter_config_to_toml(&config).unwrap();
        let parsed = parse_emitter_config(&text).unwrap();

        assert_eq!(parsed.emission_rate, config.emission_rate);
        assert_eq!(parsed.sizes, config.sizes);
        assert_eq!(parsed.colors, config.colors);
        assert_eq!(parsed.insert_mode, config.insert_mode);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = parse_emitter_config(
            r#"
            emission_rate = 25.0
            particle_life_min = 1.0
            particle_life_max = 2.0
            "#,
        )
        .unwrap();

        assert_eq!(config.emission_rate, 25.0);
        assert_eq!(config.particle_life_max, 2.0);
        // 未写的字段取默认值
        assert_eq!(config.emitter_lifetime, -1.0);
        assert_eq!(config.sizes, vec![1.0]);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = EffectPreset::Fire.config().with_emission_rate(-5.0);
        let text = emitter_config_to_toml(&config).unwrap();
        assert!(matches!(
            parse_emitter_config(&text),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            load_emitter_config("/nonexistent/emitter.toml"),
            Err(ConfigError::FileError(_))
        ));
    }
}
