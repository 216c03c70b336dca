use anyhow::Result;

use super::render::{escape, markdown, Renderer};
use super::{query_kind_matching, rest_of, Context, Handler, ParseError};
use crate::storage::row::Task;
use crate::storage::Row;

/// `task <title>`: a checkbox item. Stored tasks post their toggle to
/// `/{namespace}/task/{id}`.
pub struct TaskHandler;

impl Handler for TaskHandler {
    fn kind(&self) -> &'static str {
        "task"
    }

    fn usage(&self) -> &'static str {
        "task <title>"
    }

    fn can_handle(&self, input: &str) -> bool {
        input.starts_with("task")
    }

    fn parse(&self, input: &str) -> Result<Row, ParseError> {
        let mut row = Row::new(self.kind(), rest_of(input));
        row.bool = Some(false);
        Ok(row)
    }

    fn query(&self, ctx: &Context<'_>, input: &str) -> Result<Vec<Row>> {
        query_kind_matching(ctx, self.kind(), input)
    }

    fn render(&self, _ctx: &Context<'_>, row: &Row) -> Result<Renderer> {
        let task = Task(row);
        let done = task.is_done();

        let toggle = if row.is_stored() {
            format!(
                " hx-post=\"/{}/{}/{}\" hx-include=\"next [name='bool']\" hx-target=\"closest section.thing\" hx-swap=\"outerHTML\"",
                escape(&row.namespace),
                escape(&row.kind),
                row.id
            )
        } else {
            String::new()
        };

        let title = markdown(task.title());
        let title = if done { format!("<s>{title}</s>") } else { title };

        let body = format!(
            "<div{class}>\n\
             \t<header>\n\
             \t\t<input type=\"checkbox\"{checked}{toggle} />\n\
             \t\t<h1>{title}</h1>\n\
             \t</header>\n\
             \t{details}\n\
             </div>\n\
             <input type=\"hidden\" name=\"bool\" value=\"{done}\" />",
            class = if done { " class=\"done\"" } else { "" },
            checked = if done { " checked" } else { "" },
            details = markdown(task.details()),
        );
        Ok(Renderer::thing(row, body))
    }
}
