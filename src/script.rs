use crate::api::{ApiCall, Host, Method, Payload};
use crate::error::{ClientError, ClientResult};
use crate::rpc::{pretty, NodeApi};
use serde_json::Value;
use std::io::Write;
use std::path::Path;

/// 脚本中的一条指令：`method; api; arg1, arg2; key1:val1, key2:val2`
#[derive(Debug, Clone, PartialEq)]
pub struct Directive {
    pub line: usize,
    pub call: ApiCall,
}

/// 解析后的批处理脚本，第一行为目标节点 `host:port`
#[derive(Debug, Clone, PartialEq)]
pub struct Script {
    pub host: Host,
    pub directives: Vec<Directive>,
}

fn script_error(line: usize, message: impl Into<String>) -> ClientError {
    ClientError::Script {
        line,
        message: message.into(),
    }
}

fn parse_args(field: &str) -> Vec<String> {
    field
        .split(',')
        .map(str::trim)
        .filter(|arg| !arg.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_payload(field: &str, line: usize) -> ClientResult<Option<Payload>> {
    let mut payload = Payload::new();
    for entry in field.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (key, value) = entry
            .split_once(':')
            .ok_or_else(|| script_error(line, format!("payload entry {:?} is not key:value", entry)))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(script_error(line, format!("payload entry {:?} has an empty key", entry)));
        }
        payload.insert(key.to_string(), Value::String(value.trim().to_string()));
    }
    Ok(if payload.is_empty() { None } else { Some(payload) })
}

/// 解析单行指令；`line` 从 1 开始，仅用于错误信息
pub fn parse_directive(text: &str, line: usize) -> ClientResult<Directive> {
    let fields: Vec<&str> = text.split(';').map(str::trim).collect();
    if fields.len() < 2 {
        return Err(script_error(line, "expected at least `method; api`"));
    }
    if fields.len() > 4 {
        return Err(script_error(line, format!("expected 4 fields, found {}", fields.len())));
    }

    let method: Method = fields[0]
        .parse()
        .map_err(|e: ClientError| script_error(line, e.to_string()))?;
    let path = fields[1];
    if !path.starts_with('/') {
        return Err(script_error(line, format!("api path {:?} must begin with '/'", path)));
    }
    let args = parse_args(fields.get(2).copied().unwrap_or(""));
    if let Some(arg) = args.iter().find(|arg| arg.contains('/')) {
        return Err(script_error(line, format!("argument {:?} contains '/'", arg)));
    }
    let payload = parse_payload(fields.get(3).copied().unwrap_or(""), line)?;

    Ok(Directive {
        line,
        call: ApiCall::new(method, path, args, payload),
    })
}

impl Script {
    /// 先整体解析，任何一行有误则不发送任何请求
    pub fn parse(source: &str) -> ClientResult<Script> {
        let mut lines = source.lines().enumerate();
        let host = match lines.next() {
            Some((_, first)) if !first.trim().is_empty() => Host::from_authority(first),
            Some(_) => return Err(script_error(1, "first line must name the target host:port")),
            None => return Err(script_error(1, "script is empty")),
        };

        let mut directives = Vec::new();
        for (index, text) in lines {
            let text = text.trim();
            if text.is_empty() || text.starts_with('#') {
                continue;
            }
            directives.push(parse_directive(text, index + 1)?);
        }

        Ok(Script { host, directives })
    }

    pub fn load(path: &Path) -> ClientResult<Script> {
        let source = std::fs::read_to_string(path)?;
        Script::parse(&source)
    }

    /// 顺序执行所有指令；某条失败即停止，已发送的请求不会回滚
    pub async fn execute<A: NodeApi + ?Sized, W: Write>(&self, api: &A, out: &mut W) -> ClientResult<usize> {
        for directive in &self.directives {
            tracing::debug!("📜 第 {} 行: {}", directive.line, directive.call);
            let response = api.request(&self.host, &directive.call).await.map_err(|e| {
                tracing::warn!("❌ 脚本第 {} 行执行失败: {}", directive.line, e);
                e
            })?;
            writeln!(out, "{}", pretty(&response))?;
        }
        Ok(self.directives.len())
    }
}

/// 读取脚本文件并对第一行指定的节点执行
pub async fn run_script<A: NodeApi + ?Sized, W: Write>(api: &A, path: &Path, out: &mut W) -> ClientResult<usize> {
    let script = Script::load(path)?;
    tracing::info!("📜 执行脚本 {} -> {} ({} 条指令)", path.display(), script.host, script.directives.len());
    script.execute(api, out).await
}
