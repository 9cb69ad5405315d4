//! Rendering documents for `lvrt render` and `lvrt check`.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Receiver;

use anyhow::{bail, Context, Result};
use lvrt_runtime::{FixedCanvas, HostEvent, RuntimeConfig, RuntimeSession, StyleOverride};
use serde::Serialize;

/// Options for rendering one document.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// XML document to render.
    pub file: PathBuf,

    /// Components to register first, as `name=path`.
    pub components: Vec<String>,

    /// Screen style overrides, as `key=value`.
    pub styles: Vec<String>,

    /// Canvas selector looked up in the configuration.
    pub canvas: String,

    /// Explicit canvas size, bypassing the selector table.
    pub size: Option<String>,

    /// Object paths to report after rendering.
    pub queries: Vec<String>,

    /// Frames to run after rendering.
    pub frames: u32,

    /// Print the rendered tree as JSON.
    pub dump: bool,

    /// Print every log event.
    pub show_logs: bool,
}

#[derive(Serialize)]
struct QueryReport<'a> {
    path: &'a str,
    area: Option<lvrt_runtime::ObjectArea>,
}

/// Parse `WIDTHxHEIGHT`.
pub fn parse_size(raw: &str) -> Result<(u32, u32)> {
    let (width, height) = raw
        .split_once(['x', 'X'])
        .with_context(|| format!("Size `{raw}` is not of the form WIDTHxHEIGHT"))?;
    let width: u32 = width.trim().parse().with_context(|| format!("Invalid width in `{raw}`"))?;
    let height: u32 = height.trim().parse().with_context(|| format!("Invalid height in `{raw}`"))?;
    if width == 0 || height == 0 {
        bail!("Canvas size `{raw}` must be non-zero");
    }
    Ok((width, height))
}

/// Parse `name=path`.
pub fn parse_component_arg(raw: &str) -> Result<(String, PathBuf)> {
    match raw.split_once('=') {
        Some((name, path)) if !name.trim().is_empty() && !path.trim().is_empty() => {
            Ok((name.trim().to_string(), PathBuf::from(path.trim())))
        }
        _ => bail!("Component `{raw}` is not of the form NAME=PATH"),
    }
}

fn read_xml(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read `{}`", path.display()))
}

fn print_events(events: &Receiver<HostEvent>, show_logs: bool) {
    for event in events.try_iter() {
        match &event {
            HostEvent::Log(line) if show_logs => eprintln!("{}: {line}", event.name()),
            HostEvent::Log(_) => {}
            HostEvent::RenderError(message) => eprintln!("{}: {message}", event.name()),
            HostEvent::RenderComplete => eprintln!("{}", event.name()),
        }
    }
}

/// Render a document; returns whether rendering succeeded.
pub fn run(options: &RenderOptions, config: RuntimeConfig) -> Result<bool> {
    let overrides = options
        .styles
        .iter()
        .map(|raw| {
            StyleOverride::parse(raw).with_context(|| format!("Style `{raw}` is not of the form KEY=VALUE"))
        })
        .collect::<Result<Vec<_>>>()?;
    let components = options
        .components
        .iter()
        .map(String::as_str)
        .map(parse_component_arg)
        .collect::<Result<Vec<_>>>()?;
    let document = read_xml(&options.file)?;

    let (mut session, events) = RuntimeSession::with_config(config);
    if let Some(size) = &options.size {
        let (width, height) = parse_size(size)?;
        session = session.with_canvas(Box::new(FixedCanvas::new(width, height)));
    }

    session
        .initialize(&options.canvas)
        .with_context(|| format!("Failed to initialize canvas `{}`", options.canvas))?;
    print_events(&events, options.show_logs);

    for (name, path) in &components {
        let source = read_xml(path)?;
        let registered = session.register_component(name, Some(source.as_str()));
        print_events(&events, options.show_logs);
        registered.with_context(|| format!("Failed to load component `{name}`"))?;
    }

    let rendered = session.render(&document, &overrides).is_ok();
    print_events(&events, options.show_logs);

    for _ in 0..options.frames {
        session.frame();
    }

    for path in &options.queries {
        let report = QueryReport {
            path,
            area: session.get_object_area(path)?,
        };
        println!("{}", serde_json::to_string(&report)?);
    }

    if options.dump {
        if let Some(snapshot) = session.snapshot()? {
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
    }

    session.cleanup();
    print_events(&events, options.show_logs);
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("800x480").unwrap(), (800, 480));
        assert_eq!(parse_size("1024X600").unwrap(), (1024, 600));
        assert!(parse_size("800").is_err());
        assert!(parse_size("0x10").is_err());
        assert!(parse_size("ax10").is_err());
    }

    #[test]
    fn test_parse_component_arg() {
        let (name, path) = parse_component_arg("card=ui/card.xml").unwrap();
        assert_eq!(name, "card");
        assert_eq!(path, PathBuf::from("ui/card.xml"));
        assert!(parse_component_arg("card").is_err());
        assert!(parse_component_arg("=x.xml").is_err());
    }

    #[test]
    fn test_run_renders_document_with_component() {
        let dir = tempfile::tempdir().unwrap();
        let card = dir.path().join("card.xml");
        let doc = dir.path().join("doc.xml");
        fs::write(&card, r#"<lv_label text="card"/>"#).unwrap();
        fs::write(&doc, r#"<lv_obj><card name="c"/></lv_obj>"#).unwrap();

        let options = RenderOptions {
            file: doc,
            components: vec![format!("card={}", card.display())],
            styles: vec!["style_pad_all=4".to_string()],
            canvas: "#canvas".to_string(),
            size: Some("320x240".to_string()),
            queries: vec!["lv_obj_0/c".to_string()],
            frames: 2,
            ..RenderOptions::default()
        };
        assert!(run(&options, RuntimeConfig::default()).unwrap());
    }

    #[test]
    fn test_run_reports_render_failure() {
        let dir = tempfile::tempdir().unwrap();
        let doc = dir.path().join("doc.xml");
        fs::write(&doc, "<no_such_widget/>").unwrap();

        let options = RenderOptions {
            file: doc,
            canvas: "#canvas".to_string(),
            ..RenderOptions::default()
        };
        assert!(!run(&options, RuntimeConfig::default()).unwrap());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let options = RenderOptions {
            file: PathBuf::from("/nonexistent/doc.xml"),
            canvas: "#canvas".to_string(),
            ..RenderOptions::default()
        };
        assert!(run(&options, RuntimeConfig::default()).is_err());
    }
}
