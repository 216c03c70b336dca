#![allow(dead_code)]

use rusqlite::Connection;
use things::db;
use things::handler::{Context, Handlers, Reminders};
use things::storage::{self, Row};

/// Open a fresh in-memory database with schema and migrations applied.
pub fn test_db() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::schema::init_schema(&conn).unwrap();
    db::migrations::run_migrations(&conn).unwrap();
    conn
}

/// Everything a handler context borrows, owned in one place for tests.
pub struct World {
    pub conn: Connection,
    pub handlers: Handlers,
    pub reminders: Reminders,
}

impl World {
    pub fn new() -> Self {
        Self {
            conn: test_db(),
            handlers: Handlers::standard(),
            reminders: Reminders::new(),
        }
    }

    pub fn ctx<'a>(&'a self, namespace: &'a str) -> Context<'a> {
        Context {
            conn: &self.conn,
            namespace,
            handlers: &self.handlers,
            reminders: &self.reminders,
            limit: 100,
        }
    }

    /// Run one line of input through the pipeline and return the HTML.
    pub fn tell(&self, namespace: &str, input: &str) -> String {
        things::handler::pipeline::handle_input(&self.ctx(namespace), input)
            .unwrap()
            .to_html()
    }

    /// Insert a row directly. Returns the stored row.
    pub fn insert(&self, namespace: &str, row: Row) -> Row {
        storage::insert(&self.conn, namespace, row).unwrap()
    }
}
