use crate::settings::UpdaterSettings;
use ajaxkit_shared::color::Rgb;
use ajaxkit_shared::document::DocumentHandle;
use ajaxkit_shared::errors::Error;
use ajaxkit_shared::node::NodeId;
use ajaxkit_shared::traits::dom::Dom;
use ajaxkit_shared::types::Result;
use ajaxkit_web_platform::{Callback, TimerId, TokioExecutor, WebTimers};
use derive_more::Display;
use log::{debug, warn};
use std::cell::Cell;
use std::rc::Rc;
use std::str::FromStr;

/// Colours a node can be highlighted with
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HighlightColor {
    #[display("yellow")]
    Yellow,
    #[display("blue")]
    Blue,
    #[display("red")]
    Red,
    #[display("green")]
    Green,
    #[display("grey")]
    Grey,
    #[display("purple")]
    Purple,
    #[display("orange")]
    Orange,
}

impl HighlightColor {
    pub const ALL: [HighlightColor; 7] = [
        HighlightColor::Yellow,
        HighlightColor::Blue,
        HighlightColor::Red,
        HighlightColor::Green,
        HighlightColor::Grey,
        HighlightColor::Purple,
        HighlightColor::Orange,
    ];

    /// The colour the highlight starts from
    #[must_use]
    pub fn rgb(&self) -> Rgb {
        match self {
            HighlightColor::Yellow => Rgb::new(0xF0, 0xEE, 0x85),
            HighlightColor::Blue => Rgb::new(0x56, 0x85, 0xFC),
            HighlightColor::Red => Rgb::new(0xDC, 0x85, 0x85),
            HighlightColor::Green => Rgb::new(0x9F, 0xDF, 0x85),
            HighlightColor::Grey => Rgb::new(0x80, 0x80, 0x80),
            HighlightColor::Purple => Rgb::new(0xC5, 0x85, 0xDC),
            HighlightColor::Orange => Rgb::new(0xFC, 0xCA, 0x85),
        }
    }
}

impl FromStr for HighlightColor {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        HighlightColor::ALL
            .into_iter()
            .find(|color| color.to_string() == s)
            .ok_or_else(|| Error::UnknownEffect(s.to_string()))
    }
}

/// A visual transition applied to a node after an update
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Effect {
    #[display("highlight-{_0}")]
    Highlight(HighlightColor),
    #[display("blink")]
    Blink,
}

impl FromStr for Effect {
    type Err = Error;

    /// Accepts `blink`, `highlight-<colour>` or a bare colour name
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s == "blink" {
            return Ok(Effect::Blink);
        }

        let color = s.strip_prefix("highlight-").unwrap_or(s);
        color
            .parse()
            .map(Effect::Highlight)
            .map_err(|_| Error::UnknownEffect(s.to_string()))
    }
}

/// Runs effects on the nodes of a document. Effects are fire-and-forget: they touch the node
/// right away and finish on timers of the local event loop.
pub struct Effects<D: Dom> {
    document: DocumentHandle<D>,
    timers: WebTimers,
    settings: UpdaterSettings,
}

impl<D: Dom> Clone for Effects<D> {
    fn clone(&self) -> Self {
        Self {
            document: self.document.clone(),
            timers: self.timers.clone(),
            settings: self.settings.clone(),
        }
    }
}

impl<D: Dom> Effects<D> {
    pub fn new(document: DocumentHandle<D>, timers: WebTimers, settings: UpdaterSettings) -> Self {
        Self {
            document,
            timers,
            settings,
        }
    }

    /// Starts the effect on `node` and returns the timer that finishes it
    pub fn apply(&self, effect: Effect, node: NodeId) -> Result<TimerId> {
        match effect {
            Effect::Highlight(color) => self.highlight(color, node),
            Effect::Blink => self.blink(node),
        }
    }

    /// Sets the background of `node` to `color` and fades it back to the resting background over
    /// the highlight duration. A transparent node fades toward white and ends transparent again.
    /// Nothing but the background colour is touched.
    pub fn highlight(&self, color: HighlightColor, node: NodeId) -> Result<TimerId> {
        let resting = self.document.get().background_color(node)?;
        let from = color.rgb();
        let to = resting.unwrap_or(Rgb::WHITE);

        self.document.get_mut().set_background_color(node, Some(from))?;

        let frame_ms = self.settings.highlight_frame.as_millis().max(1);
        let frames = self.settings.highlight_duration.as_millis().div_ceil(frame_ms).max(1) as u32;

        let step = Rc::new(Cell::new(0u32));
        let own_id: Rc<Cell<Option<TimerId>>> = Rc::new(Cell::new(None));

        let callback = {
            let document = self.document.clone();
            let timers = self.timers.clone();
            let own_id = own_id.clone();

            Callback::new(move |_: &mut TokioExecutor, ()| {
                step.set(step.get() + 1);
                let done = step.get() >= frames;

                let background = if done {
                    resting
                } else {
                    Some(from.lerp(to, step.get() as f32 / frames as f32))
                };

                let result = document.get_mut().set_background_color(node, background);
                if let Err(err) = &result {
                    warn!("effects: highlight of node {node} stopped: {err}");
                }

                if done || result.is_err() {
                    if let Some(id) = own_id.get() {
                        timers.clear(id);
                    }
                }
            })
        };

        let id = self.timers.set_interval(self.settings.highlight_frame, callback);
        own_id.set(Some(id));

        debug!("effects: highlight {color} on node {node} in {frames} frames");
        Ok(id)
    }

    /// Dims `node` and restores the opacity it had before after the blink duration
    pub fn blink(&self, node: NodeId) -> Result<TimerId> {
        let resting = self.document.get().opacity(node)?;
        self.document.get_mut().set_opacity(node, self.settings.blink_opacity)?;

        let document = self.document.clone();
        let callback = Callback::new(move |_: &mut TokioExecutor, ()| {
            if let Err(err) = document.get_mut().set_opacity(node, resting) {
                warn!("effects: could not restore opacity of node {node}: {err}");
            }
        });

        debug!("effects: blink on node {node}");
        Ok(self.timers.set_timeout(self.settings.blink_duration, callback))
    }
}
