//! Scripted host for session replay

use sift_core::Size;
use sift_platform::{FocusOptions, FocusTarget, Host, PlatformError, Result};
use tracing::debug;

use crate::config::HostConfig;

/// In-memory host: a fixed viewport and a focus slot
#[derive(Debug)]
pub struct ScriptHost {
    pub viewport: Size,
    pub focused: Option<FocusTarget>,
    reject_preserve_scroll: bool,
    reject_focus: bool,
}

impl ScriptHost {
    pub fn new(viewport: Size, config: &HostConfig) -> Self {
        Self {
            viewport,
            focused: None,
            reject_preserve_scroll: config.reject_preserve_scroll,
            reject_focus: config.reject_focus,
        }
    }
}

impl Host for ScriptHost {
    fn viewport(&self) -> Size {
        self.viewport
    }

    fn focus(&mut self, target: FocusTarget, options: FocusOptions) -> Result<()> {
        if self.reject_focus {
            return Err(PlatformError::FocusRejected(format!("{target:?} is not focusable")));
        }
        if options.prevent_scroll && self.reject_preserve_scroll {
            return Err(PlatformError::FocusRejected(
                "preventScroll is not supported".to_string(),
            ));
        }
        debug!(?target, prevent_scroll = options.prevent_scroll, "focus moved");
        self.focused = Some(target);
        Ok(())
    }
}
