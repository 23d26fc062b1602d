#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Ping,
    ViewerInit,
    ViewerSelect,
    ViewerSnapshot,
    ViewerRenderHtml,
    ViewerAudit,
    SchemaFlatten,
    CoverageCompute,
    Unknown,
}

impl From<&str> for Command {
    fn from(s: &str) -> Self {
        match s {
            "ping" => Command::Ping,
            "viewer.init" => Command::ViewerInit,
            "viewer.select" => Command::ViewerSelect,
            "viewer.snapshot" => Command::ViewerSnapshot,
            "viewer.render_html" => Command::ViewerRenderHtml,
            "viewer.audit" => Command::ViewerAudit,
            "schema.flatten" => Command::SchemaFlatten,
            "coverage.compute" => Command::CoverageCompute,
            _ => Command::Unknown,
        }
    }
}
