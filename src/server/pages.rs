//! Full HTML pages. Everything else the server returns is a fragment.

use crate::handler::render::escape;

const HTMX_SRC: &str = "https://unpkg.com/htmx.org@1.9.12/dist/htmx.min.js";

fn layout(title: &str, main: &str) -> String {
    format!(
        r#"<!doctype html>
<html>
<head>
	<meta charset="utf-8" />
	<meta name="viewport" content="width=device-width, initial-scale=1" />
	<title>{title}</title>

	<link rel="stylesheet" href="/static/things.css" />
</head>

<body>
	<main>
{main}
	</main>

	<script src="{HTMX_SRC}"></script>
	<script src="/static/things.js"></script>
</body>
</html>
"#,
        title = escape(title),
    )
}

/// The text box. Empty input is posted on load so the overview shows up.
pub fn index() -> String {
    layout(
        "things",
        r##"		<div>
			<input id="tell-me" name="tell-me" type="text" autofocus autocomplete="off" placeholder="tell me things"
				hx-post="/thing"
				hx-trigger="load, every 60s, input changed delay:250ms, keyup[key=='Enter']"
				hx-target="#answer"
				hx-indicator="#waiting" />
			<span id="waiting" class="htmx-indicator">…</span>
		</div>

		<section id="answer">
		</section>"##,
    )
}

/// Rows carrying one tag, already rendered.
pub fn tag(tag: &str, body: &str) -> String {
    let title = format!("#{tag}");
    let main = format!(
        "\t\t<h1><a href=\"/\">things</a> {}</h1>\n\t\t<section id=\"answer\">\n{body}\t\t</section>",
        escape(&title)
    );
    layout(&title, &main)
}
