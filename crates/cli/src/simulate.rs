//! Replays a parsed script against a [`MenuRuntime`] over a [`MemoryDom`].
//!
//! Element clicks go through the same path a browser would take: the
//! element's own listener first (trigger, logo or panel link, matched by
//! containment), then the document-level click.

use std::io::Write;

use anyhow::{Context, Result};
use navmenu::{Dom, MemoryDom, MenuRuntime, MenuSnapshot, Msg, NodeId};
use serde::Serialize;
use tracing::debug;

use crate::script::{ScriptLine, Step};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotRecord<'a> {
    line: Option<usize>,
    #[serde(flatten)]
    snapshot: &'a MenuSnapshot,
}

pub struct Simulator {
    runtime: MenuRuntime<MemoryDom>,
    format: OutputFormat,
}

impl Simulator {
    pub fn new(runtime: MenuRuntime<MemoryDom>, format: OutputFormat) -> Self {
        Self { runtime, format }
    }

    pub fn runtime(&self) -> &MenuRuntime<MemoryDom> {
        &self.runtime
    }

    /// Runs every step, then writes the final snapshot.
    pub async fn run<W: Write>(&mut self, script: &[ScriptLine], out: &mut W) -> Result<()> {
        for line in script {
            self.step(line, out)
                .await
                .with_context(|| format!("script line {} failed", line.number))?;
        }
        self.write_snapshot(None, out)
    }

    async fn step<W: Write>(&mut self, line: &ScriptLine, out: &mut W) -> Result<()> {
        debug!(line = line.number, step = ?line.step, "script step");
        match &line.step {
            Step::ClickTrigger => {
                let trigger = *self.runtime.controller().trigger();
                self.click(trigger);
            }
            Step::ClickLogo => match self.logo() {
                Some(logo) => self.click(logo),
                None => {
                    self.runtime.dispatch(Msg::LogoClicked);
                }
            },
            Step::ClickElement(id) => {
                let node = self
                    .runtime
                    .controller()
                    .dom()
                    .element_by_id(id)
                    .with_context(|| format!("no element with id `{id}`"))?;
                self.click(node);
            }
            Step::ClickLink(index) => {
                let links = self.runtime.controller().links();
                let link = links
                    .get(*index)
                    .copied()
                    .with_context(|| format!("link index {index} out of range; the panel has {} links", links.len()))?;
                self.click(link);
            }
            Step::Key(input) => {
                self.runtime.dispatch(Msg::DocumentKeyDown(input.clone()));
            }
            Step::TriggerKey(input) => {
                self.runtime.dispatch(Msg::TriggerKeyDown(input.clone()));
                self.runtime.dispatch(Msg::DocumentKeyDown(input.clone()));
            }
            Step::TouchStart(y) => {
                self.runtime.dispatch(Msg::TouchStarted { y: *y });
            }
            Step::TouchMove(y) => {
                self.runtime.dispatch(Msg::TouchMoved { y: *y });
            }
            Step::TouchEnd => {
                self.runtime.dispatch(Msg::TouchEnded);
            }
            Step::Resize(width) => {
                self.runtime.controller_mut().dom_mut().set_viewport_width(*width);
                self.runtime.dispatch(Msg::Resized);
            }
            Step::Wait => self.runtime.settle().await,
            Step::Snapshot => self.write_snapshot(Some(line.number), out)?,
        }
        Ok(())
    }

    fn click(&mut self, node: NodeId) {
        let controller = self.runtime.controller();
        let dom = controller.dom();
        let msg = if dom.contains(controller.trigger(), &node) {
            Some(Msg::TriggerClicked)
        } else if self.logo().is_some_and(|logo| dom.contains(&logo, &node)) {
            Some(Msg::LogoClicked)
        } else {
            controller
                .links()
                .iter()
                .find(|link| dom.contains(link, &node))
                .map(|link| Msg::LinkActivated { link: *link })
        };

        let mut prevented = false;
        if let Some(msg) = msg {
            prevented |= self.runtime.dispatch(msg).default_prevented;
        }
        prevented |= self
            .runtime
            .dispatch(Msg::DocumentClicked { target: node })
            .default_prevented;
        if prevented {
            debug!(?node, "default action prevented");
        }
    }

    fn logo(&self) -> Option<NodeId> {
        let controller = self.runtime.controller();
        let id = controller.config().selectors.logo_id.as_deref()?;
        controller.dom().element_by_id(id)
    }

    fn write_snapshot<W: Write>(&self, line: Option<usize>, out: &mut W) -> Result<()> {
        let snapshot = self.runtime.controller().snapshot();
        match self.format {
            OutputFormat::Text => match line {
                Some(line) => writeln!(out, "[line {line}] {snapshot}")?,
                None => writeln!(out, "[final] {snapshot}")?,
            },
            OutputFormat::Json => {
                serde_json::to_writer(&mut *out, &SnapshotRecord {
                    line,
                    snapshot: &snapshot,
                })?;
                writeln!(out)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use navmenu::{ElementSpec, MenuConfig, MenuState, PageSpec};

    use super::*;
    use crate::script::parse_script;

    fn simulator(format: OutputFormat) -> Simulator {
        let page = PageSpec::default()
            .child(ElementSpec::new("a").id("logo").attr("href", "/"))
            .child(ElementSpec::new("button").id("hamburger").attr("aria-expanded", "false"))
            .child(
                ElementSpec::new("nav")
                    .id("nav-links")
                    .child(ElementSpec::link("#about").child(ElementSpec::new("span").id("about-label")))
                    .child(ElementSpec::link("#contact")),
            )
            .child(ElementSpec::new("section").id("about"))
            .child(ElementSpec::new("p").id("outside"));
        let config = MenuConfig::from_json_str(r#"{"selectors": {"logoId": "logo"}}"#).unwrap();
        let runtime = MenuRuntime::mount(MemoryDom::from_page(&page), config).unwrap();
        Simulator::new(runtime, format)
    }

    async fn run(simulator: &mut Simulator, script: &str) -> String {
        let script = parse_script(script).unwrap();
        let mut out = Vec::new();
        simulator.run(&script, &mut out).await.unwrap();
        String::from_utf8(out).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_then_click_outside() {
        let mut simulator = simulator(OutputFormat::Text);
        let output = run(&mut simulator, "click trigger\nwait\nsnapshot\nclick outside\n").await;

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("[line 3] state=open locked=false aria-expanded=true"));
        assert!(lines[1].starts_with("[final] state=closed"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_click_inside_link_closes_and_scrolls() {
        let mut simulator = simulator(OutputFormat::Text);
        run(&mut simulator, "click trigger\nwait\nclick about-label\n").await;

        let runtime = simulator.runtime();
        assert_eq!(runtime.controller().state(), MenuState::Closed);
        let about = runtime.controller().dom().element_by_id("about").unwrap();
        assert_eq!(runtime.controller().dom().scrolls().last().map(|scroll| scroll.node), Some(about));
    }

    #[tokio::test(start_paused = true)]
    async fn test_logo_click_uses_lightweight_toggle() {
        let mut simulator = simulator(OutputFormat::Text);
        run(&mut simulator, "click logo\n").await;

        let controller = simulator.runtime().controller();
        assert!(controller.is_open());
        assert!(!controller.is_locked());
        assert!(!controller.document_listeners_attached());
    }

    #[tokio::test(start_paused = true)]
    async fn test_json_output_is_one_object_per_line() {
        let mut simulator = simulator(OutputFormat::Json);
        let output = run(&mut simulator, "trigger-key enter\nsnapshot\n").await;

        let records: Vec<serde_json::Value> = output
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["line"], 2);
        assert_eq!(records[0]["state"], "open");
        assert_eq!(records[0]["locked"], true);
        assert_eq!(records[1]["line"], serde_json::Value::Null);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_element_reports_line() {
        let mut simulator = simulator(OutputFormat::Text);
        let script = parse_script("wait\nclick missing\n").unwrap();
        let error = simulator.run(&script, &mut Vec::<u8>::new()).await.unwrap_err();
        assert_eq!(error.to_string(), "script line 2 failed");
        assert!(format!("{error:#}").contains("no element with id `missing`"));
    }
}
