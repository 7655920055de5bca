//! 配置校验模块
//!
//! 校验规则：
//! - 字段级规则由 `validator` derive 声明 (max_rows >= 1, topic 非空, flush_every >= 1 ...)
//! - dataset_url 为空或 http(s) URL
//! - dataset_file 必须是单纯的文件名 (不含目录)

use std::path::Path;

use contracts::{ContractError, RelaySettings};
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

/// 校验 RelaySettings 配置
///
/// 返回第一个遇到的错误 (按字段路径排序)，或 Ok(())。
pub fn validate(settings: &RelaySettings) -> Result<(), ContractError> {
    validate_fields(settings)?;
    validate_dataset_file(settings)?;
    Ok(())
}

/// 字段级校验
fn validate_fields(settings: &RelaySettings) -> Result<(), ContractError> {
    let Err(errors) = settings.validate() else {
        return Ok(());
    };

    let mut flat = Vec::new();
    flatten_errors("", &errors, &mut flat);
    flat.sort();

    match flat.into_iter().next() {
        Some((field, message)) => Err(ContractError::config_validation(field, message)),
        None => Err(ContractError::config_validation("<root>", errors.to_string())),
    }
}

/// 展开嵌套的校验错误为 (字段路径, 消息)
fn flatten_errors(prefix: &str, errors: &ValidationErrors, out: &mut Vec<(String, String)>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };

        match kind {
            ValidationErrorsKind::Field(errs) => {
                for e in errs {
                    out.push((path.clone(), e.to_string()));
                }
            }
            ValidationErrorsKind::Struct(inner) => flatten_errors(&path, inner, out),
            ValidationErrorsKind::List(items) => {
                for (idx, inner) in items {
                    flatten_errors(&format!("{path}[{idx}]"), inner, out);
                }
            }
        }
    }
}

/// 校验数据文件名
fn validate_dataset_file(settings: &RelaySettings) -> Result<(), ContractError> {
    let file = Path::new(&settings.dataset_file);
    let is_plain_name = file
        .file_name()
        .is_some_and(|name| name == file.as_os_str());

    if !is_plain_name {
        return Err(ContractError::config_validation(
            "dataset_file",
            format!(
                "dataset_file must be a file name without directories, got '{}'",
                settings.dataset_file
            ),
        ));
    }
    Ok(())
}
