use serde_json::{json, Value};

use crate::config::ViewerConfig;
use crate::error::{ViewerError, STARTUP_NOTICE};
use crate::model::document::Document;
use crate::services::loader::{AssetLoader, JsonLoader};
use crate::services::presenter::{Event, Presenter};
use crate::services::{audit, coverage, fingerprint, html, schema};

mod command;
use command::Command;

fn get_cmd(req: &Value) -> &str {
    req.get("cmd").and_then(|v| v.as_str()).unwrap_or("")
}

fn get_id(req: &Value) -> Value {
    req.get("id").cloned().unwrap_or(Value::Null)
}

fn get_payload(req: &Value) -> &Value {
    static EMPTY: Value = Value::Null;
    req.get("payload").unwrap_or(&EMPTY)
}

fn ok(id: Value, payload: Value) -> String {
    json!({
        "id": id,
        "status": "ok",
        "payload": payload
    })
    .to_string()
}

fn err(id: Value, message: impl Into<String>) -> String {
    json!({
        "id": id,
        "status": "error",
        "message": message.into()
    })
    .to_string()
}

fn fail(id: Value, e: &ViewerError) -> String {
    json!({
        "id": id,
        "status": "error",
        "code": e.code(),
        "message": e.detail()
    })
    .to_string()
}

fn required_str<'a>(payload: &'a Value, field: &str) -> Result<&'a str, ViewerError> {
    payload
        .get(field)
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ViewerError::InvalidPayload(format!("payload.{field} is required")))
}

fn required<'a>(payload: &'a Value, field: &str) -> Result<&'a Value, ViewerError> {
    payload
        .get(field)
        .ok_or_else(|| ViewerError::InvalidPayload(format!("payload.{field} is required")))
}

/// State kept between requests: where assets live and the page, once
/// initialised.
pub struct Session {
    loader: Box<dyn JsonLoader>,
    config: ViewerConfig,
    presenter: Option<Presenter>,
}

impl Default for Session {
    fn default() -> Self {
        Session::new(Box::new(AssetLoader))
    }
}

impl Session {
    pub fn new(loader: Box<dyn JsonLoader>) -> Self {
        Session {
            loader,
            config: ViewerConfig::default(),
            presenter: None,
        }
    }

    fn presenter(&self) -> Result<&Presenter, ViewerError> {
        self.presenter.as_ref().ok_or(ViewerError::NotInitialized)
    }

    pub fn handle(&mut self, input: &str) -> String {
        let req: Value = match serde_json::from_str(input) {
            Ok(v) => v,
            Err(_) => {
                return json!({
                    "status": "error",
                    "message": "invalid json"
                })
                .to_string();
            }
        };

        let id = get_id(&req);
        let cmd = Command::from(get_cmd(&req));
        let payload = get_payload(&req);

        match cmd {
            Command::Ping => ok(id, json!({ "message": "locale-viewer-core alive" })),

            Command::ViewerInit => match self.init(payload) {
                Ok(v) => ok(id, v),
                Err(e) => {
                    tracing::error!(error = %e.detail(), "initialization failed");
                    json!({
                        "id": id,
                        "status": "error",
                        "code": e.code(),
                        "message": STARTUP_NOTICE,
                        "detail": e.detail()
                    })
                    .to_string()
                }
            },

            Command::ViewerSelect => match self.select(payload) {
                Ok(v) => ok(id, v),
                Err(e) => fail(id, &e),
            },

            Command::ViewerSnapshot => match self.presenter() {
                Ok(p) => ok(
                    id,
                    json!({
                        "selection": p.selection(),
                        "document": p.document(),
                        "fingerprint": fingerprint::digest(p.document())
                    }),
                ),
                Err(e) => fail(id, &e),
            },

            Command::ViewerRenderHtml => match self.presenter() {
                Ok(p) => ok(id, json!({ "html": html::render(p.document()) })),
                Err(e) => fail(id, &e),
            },

            Command::ViewerAudit => match self.audit(payload) {
                Ok(v) => ok(id, v),
                Err(e) => fail(id, &e),
            },

            Command::SchemaFlatten => match required(payload, "template") {
                Ok(t) => ok(id, json!({ "rows": schema::flatten_schema(t) })),
                Err(e) => fail(id, &e),
            },

            Command::CoverageCompute => {
                let (t, c) = match (required(payload, "template"), required(payload, "content")) {
                    (Ok(t), Ok(c)) => (t, c),
                    (Err(e), _) | (_, Err(e)) => return fail(id, &e),
                };
                let cov = coverage::compute_coverage(c, t);
                ok(
                    id,
                    json!({
                        "filled": cov.filled,
                        "total": cov.total,
                        "coverage": cov.to_string(),
                        "authors": coverage::authors_label(c)
                    }),
                )
            }

            Command::Unknown => err(id, "unknown command"),
        }
    }

    fn init(&mut self, payload: &Value) -> Result<Value, ViewerError> {
        // a failed init shows no partial page, whatever the cause
        self.presenter = None;

        let config: ViewerConfig = if payload.is_null() {
            ViewerConfig::default()
        } else {
            serde_json::from_value(payload.clone())
                .map_err(|e| ViewerError::InvalidPayload(e.to_string()))?
        };

        let mut presenter = Presenter::attach(Document::standard())?;
        let report = presenter.initialize(self.loader.as_ref(), &config)?;

        self.presenter = Some(presenter);
        self.config = config;

        Ok(json!({ "files": report.files, "keys": report.keys }))
    }

    fn select(&mut self, payload: &Value) -> Result<Value, ViewerError> {
        let file = required_str(payload, "file")?.to_string();
        let presenter = self.presenter.as_mut().ok_or(ViewerError::NotInitialized)?;

        let report = presenter.dispatch(Event::FileSelected(file), self.loader.as_ref(), &self.config)?;
        Ok(json!({ "selection": report.selection, "missing": report.missing }))
    }

    fn audit(&self, payload: &Value) -> Result<Value, ViewerError> {
        let file = required_str(payload, "file")?;
        let presenter = self.presenter()?;

        let content = presenter.load_listed(file, self.loader.as_ref(), &self.config)?;
        let issues = audit::run(&content, presenter.schema());
        let cov = coverage::compute_coverage(&content, presenter.template());

        Ok(json!({ "file": file, "coverage": cov.to_string(), "issues": issues }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;

    struct Fixed(HashMap<String, Value>);

    impl JsonLoader for Fixed {
        fn load_json(&self, path: &str) -> Result<Value, ViewerError> {
            self.0.get(path).cloned().ok_or_else(|| ViewerError::Load {
                path: path.to_string(),
                reason: "not found".to_string(),
            })
        }
    }

    fn session() -> Session {
        let mut files = HashMap::new();
        files.insert("t.json".to_string(), json!({ "a": "A", "b": { "c": "C" } }));
        files.insert("l.json".to_string(), json!(["en.json"]));
        files.insert(
            crate::config::join_path("loc", "en.json"),
            json!({ "a": "Hello" }),
        );
        Session::new(Box::new(Fixed(files)))
    }

    fn call(s: &mut Session, line: Value) -> Value {
        serde_json::from_str(&s.handle(&line.to_string())).unwrap()
    }

    fn init_line() -> Value {
        json!({
            "id": 1,
            "cmd": "viewer.init",
            "payload": { "template_path": "t.json", "file_list_path": "l.json", "locale_dir": "loc" }
        })
    }

    #[test]
    fn invalid_json_and_unknown_command() {
        let mut s = session();
        let r: Value = serde_json::from_str(&s.handle("{oops")).unwrap();
        assert_eq!(r["message"], "invalid json");

        let r = call(&mut s, json!({ "id": 9, "cmd": "nope" }));
        assert_eq!(r["status"], "error");
        assert_eq!(r["id"], 9);
    }

    #[test]
    fn select_before_init_is_rejected() {
        let mut s = session();
        let r = call(&mut s, json!({ "cmd": "viewer.select", "payload": { "file": "en.json" } }));
        assert_eq!(r["code"], "NOT_INITIALIZED");
    }

    #[test]
    fn init_select_snapshot_flow() {
        let mut s = session();

        let r = call(&mut s, init_line());
        assert_eq!(r["status"], "ok");
        assert_eq!(r["payload"]["keys"], 2);
        assert_eq!(r["payload"]["files"][0]["coverage"], "50.0%");
        assert_eq!(r["payload"]["files"][0]["authors"], "No authors");

        let r = call(&mut s, json!({ "cmd": "viewer.select", "payload": { "file": "en.json" } }));
        assert_eq!(r["payload"]["selection"]["file"], "en.json");
        assert_eq!(r["payload"]["missing"], 1);

        let r1 = call(&mut s, json!({ "cmd": "viewer.snapshot" }));
        call(&mut s, json!({ "cmd": "viewer.select", "payload": { "file": "en.json" } }));
        let r2 = call(&mut s, json!({ "cmd": "viewer.snapshot" }));
        assert_eq!(r1["payload"]["fingerprint"], r2["payload"]["fingerprint"]);

        let r = call(&mut s, json!({ "cmd": "viewer.audit", "payload": { "file": "en.json" } }));
        assert_eq!(r["payload"]["issues"][0]["key"], "b.c");
        assert_eq!(r["payload"]["issues"][0]["code"], "MISSING_KEY");

        let r = call(&mut s, json!({ "cmd": "viewer.render_html" }));
        assert!(r["payload"]["html"].as_str().unwrap().contains("data-key=\"b.c\" class=\"missing\""));
    }

    #[test]
    fn init_failure_reports_single_notice() {
        let mut s = session();
        let mut line = init_line();
        line["payload"]["locale_dir"] = json!("elsewhere");

        let r = call(&mut s, line);
        assert_eq!(r["status"], "error");
        assert_eq!(r["message"], STARTUP_NOTICE);
        assert_eq!(r["code"], "LOAD_ERROR");

        let r = call(&mut s, json!({ "cmd": "viewer.snapshot" }));
        assert_eq!(r["code"], "NOT_INITIALIZED");
    }

    #[test]
    fn bad_init_payload_drops_the_previous_page() {
        let mut s = session();
        assert_eq!(call(&mut s, init_line())["status"], "ok");

        let r = call(&mut s, json!({ "cmd": "viewer.init", "payload": { "locale_dir": 5 } }));
        assert_eq!(r["message"], STARTUP_NOTICE);
        assert_eq!(r["code"], "INVALID_PAYLOAD");

        let r = call(&mut s, json!({ "cmd": "viewer.snapshot" }));
        assert_eq!(r["code"], "NOT_INITIALIZED");
    }

    #[test]
    fn pure_commands() {
        let mut s = session();
        let r = call(
            &mut s,
            json!({
                "cmd": "coverage.compute",
                "payload": {
                    "template": { "a": "", "b": "" },
                    "content": { "a": "hi", "@metadata": { "authors": ["Ana", "Bo"] } }
                }
            }),
        );
        assert_eq!(r["payload"]["coverage"], "50.0%");
        assert_eq!(r["payload"]["authors"], "Ana, Bo");

        let r = call(
            &mut s,
            json!({ "cmd": "schema.flatten", "payload": { "template": { "x": { "y": "d" }, "global.EOF": "" } } }),
        );
        assert_eq!(r["payload"]["rows"].as_array().unwrap().len(), 1);
        assert_eq!(r["payload"]["rows"][0]["key"], "x.y");

        let r = call(&mut s, json!({ "cmd": "coverage.compute", "payload": { "template": {} } }));
        assert_eq!(r["code"], "INVALID_PAYLOAD");
    }
}
