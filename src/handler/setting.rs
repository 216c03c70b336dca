use anyhow::Result;

use super::render::{escape, Renderer};
use super::{Context, Handler, ParseError};
use crate::storage::row::Setting;
use crate::storage::{Row, RowQuery};

/// `setting <key> <value...>`. The most recent row for a key wins.
pub struct SettingHandler;

/// Current value of `key` in `namespace`.
pub fn lookup(conn: &rusqlite::Connection, namespace: &str, key: &str) -> Result<Option<String>> {
    let rows = crate::storage::query(
        conn,
        namespace,
        &RowQuery::new().kind("setting").summary(key).limit(1),
    )?;
    Ok(rows.first().map(|row| Setting(row).value().to_string()))
}

impl Handler for SettingHandler {
    fn kind(&self) -> &'static str {
        "setting"
    }

    fn usage(&self) -> &'static str {
        "setting <key> <value...>"
    }

    fn can_handle(&self, input: &str) -> bool {
        input.starts_with("setting")
    }

    fn parse(&self, input: &str) -> Result<Row, ParseError> {
        let parts: Vec<&str> = input.splitn(3, ' ').collect();
        match parts.as_slice() {
            [_, key, value] if !key.is_empty() => {
                let mut row = Row::new(self.kind(), *key);
                // Settings carry no tags even when the value contains '#'.
                row.content = Some((*value).to_string());
                Ok(row)
            }
            _ => Err(ParseError::Usage(self.usage())),
        }
    }

    fn query(&self, ctx: &Context<'_>, _input: &str) -> Result<Vec<Row>> {
        ctx.query(RowQuery::new().kind(self.kind()))
    }

    fn render(&self, _ctx: &Context<'_>, row: &Row) -> Result<Renderer> {
        let setting = Setting(row);
        let value = if setting.is_secret() {
            "********".to_string()
        } else {
            escape(setting.value())
        };
        let body = format!("{}: {value}", escape(setting.key()));
        Ok(Renderer::thing(row, body))
    }
}
