//! 配置解析模块
//!
//! 支持 JSON (默认 settings.json) 和 TOML 格式。
//! 解析失败时报告出错位置及该行对应的配置键（如 `max_rows`）。

use contracts::{ContractError, RelaySettings};

/// 配置文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML 格式
    Toml,
    /// JSON 格式
    Json,
}

impl ConfigFormat {
    /// 从文件扩展名推断格式
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Toml => "TOML",
            Self::Json => "JSON",
        }
    }
}

/// 解析出错的位置（行号从 1 开始）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Position {
    line: usize,
    column: usize,
}

impl Position {
    /// 由字节偏移换算行列
    fn from_offset(content: &str, offset: usize) -> Self {
        let before = &content[..offset.min(content.len())];
        let line = before.matches('\n').count() + 1;
        let column = before.len() - before.rfind('\n').map_or(0, |i| i + 1) + 1;
        Self { line, column }
    }
}

/// 出错行上声明的键：JSON 取冒号前的引号内容，TOML 取等号前的名字
fn key_on_line(content: &str, line: usize) -> Option<&str> {
    let text = content.lines().nth(line.checked_sub(1)?)?.trim();
    if let Some(rest) = text.strip_prefix('"') {
        let (key, tail) = rest.split_once('"')?;
        return tail.trim_start().starts_with(':').then_some(key);
    }
    let (key, _) = text.split_once('=')?;
    let key = key.trim();
    (!key.is_empty() && !key.starts_with('[')).then_some(key)
}

fn parse_error<E>(
    content: &str,
    format: ConfigFormat,
    position: Option<Position>,
    detail: impl std::fmt::Display,
    source: E,
) -> ContractError
where
    E: std::error::Error + Send + Sync + 'static,
{
    let key = position.and_then(|p| key_on_line(content, p.line));
    let message = match (key, position) {
        (Some(key), Some(p)) => format!(
            "{} settings: key '{key}' (line {}, column {}): {detail}",
            format.label(),
            p.line,
            p.column
        ),
        (None, Some(p)) => format!(
            "{} settings: line {}, column {}: {detail}",
            format.label(),
            p.line,
            p.column
        ),
        _ => format!("{} settings: {detail}", format.label()),
    };
    ContractError::ConfigParse {
        message,
        source: Some(Box::new(source)),
    }
}

/// 解析 TOML 格式配置
pub fn parse_toml(content: &str) -> Result<RelaySettings, ContractError> {
    toml::from_str(content).map_err(|e| {
        let position = e.span().map(|span| Position::from_offset(content, span.start));
        let detail = e.message().trim().to_string();
        parse_error(content, ConfigFormat::Toml, position, detail, e)
    })
}

/// 解析 JSON 格式配置
pub fn parse_json(content: &str) -> Result<RelaySettings, ContractError> {
    serde_json::from_str(content).map_err(|e| {
        let position = (e.line() > 0).then(|| Position {
            line: e.line(),
            column: e.column(),
        });
        let full = e.to_string();
        let detail = full.split(" at line ").next().unwrap_or_default().to_string();
        parse_error(content, ConfigFormat::Json, position, detail, e)
    })
}

/// 根据格式解析配置
pub fn parse(content: &str, format: ConfigFormat) -> Result<RelaySettings, ContractError> {
    match format {
        ConfigFormat::Toml => parse_toml(content),
        ConfigFormat::Json => parse_json(content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_settings() {
        let content = r#"{
            "dataset_url": "https://data.example.org/fire_incidents.csv",
            "max_rows": 25,
            "output_strategy": "kafka",
            "output_config": {
                "kafka": { "bootstrap_servers": "localhost:9092", "topic": "fire_incidents" },
                "redis": { "host": "localhost", "port": 6379, "db": 0, "key_prefix": "fire_incident:" }
            }
        }"#;
        let result = parse_json(content);
        assert!(result.is_ok(), "Failed: {:?}", result.err());
        let settings = result.unwrap();
        assert_eq!(settings.max_rows, 25);
        assert_eq!(settings.output_strategy, "kafka");
        assert_eq!(settings.output_config.queue.topic, "fire_incidents");
    }

    #[test]
    fn test_parse_toml_settings() {
        let content = r#"
dataset_url = "https://data.example.org/fire_incidents.csv"
max_rows = 10
output_strategy = "store"
data_dir = "/var/lib/relay"

[output_config.store]
host = "cache"
flush_every = 50
"#;
        let result = parse_toml(content);
        assert!(result.is_ok(), "Failed: {:?}", result.err());
        let settings = result.unwrap();
        assert_eq!(settings.output_config.store.host, "cache");
        assert_eq!(settings.output_config.store.flush_every, 50);
        assert_eq!(settings.output_config.store.port, 6379);
    }

    #[test]
    fn test_parse_json_type_error() {
        let content = r#"{ "max_rows": "many" }"#;
        let result = parse_json(content);
        assert!(matches!(result, Err(ContractError::ConfigParse { .. })));
    }

    #[test]
    fn test_json_error_names_key() {
        let content = "{\n  \"dataset_url\": \"\",\n  \"max_rows\": \"many\"\n}";
        let message = parse_json(content).unwrap_err().to_string();
        assert!(message.contains("key 'max_rows'"), "got: {message}");
        assert!(message.contains("line 3"), "got: {message}");
    }

    #[test]
    fn test_toml_error_names_key() {
        let content = "dataset_url = \"\"\nmax_rows = \"many\"\n";
        let message = parse_toml(content).unwrap_err().to_string();
        assert!(message.contains("key 'max_rows'"), "got: {message}");
        assert!(message.contains("line 2"), "got: {message}");
    }

    #[test]
    fn test_position_from_offset() {
        let content = "ab\ncde\nf";
        assert_eq!(Position::from_offset(content, 0), Position { line: 1, column: 1 });
        assert_eq!(Position::from_offset(content, 4), Position { line: 2, column: 2 });
        assert_eq!(Position::from_offset(content, 99), Position { line: 3, column: 2 });
    }

    #[test]
    fn test_key_on_line() {
        let content = "{\n  \"topic\": 5,\n  [\n}";
        assert_eq!(key_on_line(content, 2), Some("topic"));
        assert_eq!(key_on_line(content, 3), None);
        assert_eq!(key_on_line("port = \"x\"", 1), Some("port"));
        assert_eq!(key_on_line("[output_config.store]", 1), None);
        assert_eq!(key_on_line("", 0), None);
    }

    #[test]
    fn test_parse_toml_syntax_error() {
        let content = "invalid toml [[[";
        let result = parse_toml(content);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ContractError::ConfigParse { .. }));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            ConfigFormat::from_extension("toml"),
            Some(ConfigFormat::Toml)
        );
        assert_eq!(
            ConfigFormat::from_extension("JSON"),
            Some(ConfigFormat::Json)
        );
        assert_eq!(ConfigFormat::from_extension("yaml"), None);
    }
}
