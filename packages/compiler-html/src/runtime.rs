//! Click actions and the script that performs them in the exported page

use serde::{Deserialize, Serialize};

/// Action attached to a node's `action` prop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClickAction {
    #[serde(rename_all = "camelCase")]
    OpenUrl {
        url: String,
        #[serde(default)]
        new_tab: bool,
    },
    /// Scroll the node with this id into view
    ScrollTo { target: String },
    Toast { message: String },
}

impl ClickAction {
    /// JSON carried in the `data-action` attribute
    pub fn to_attribute(&self) -> String {
        // Plain string fields always serialize
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Delegated click handler reading `data-action`
pub const RUNTIME_JS: &str = r#"(function () {
  function toast(message) {
    var el = document.createElement("div");
    el.setAttribute("role", "status");
    el.textContent = message;
    el.style.cssText = "position:fixed;left:50%;bottom:24px;transform:translateX(-50%);" +
      "padding:8px 16px;border-radius:6px;background:#222;color:#fff;z-index:1000";
    document.body.appendChild(el);
    setTimeout(function () { el.remove(); }, 3000);
  }

  document.addEventListener("click", function (event) {
    var el = event.target.closest("[data-action]");
    if (!el) return;
    var action;
    try {
      action = JSON.parse(el.getAttribute("data-action"));
    } catch (err) {
      return;
    }
    event.preventDefault();
    switch (action.type) {
      case "openUrl":
        if (action.newTab) window.open(action.url, "_blank", "noopener");
        else window.location.href = action.url;
        break;
      case "scrollTo":
        var target = document.querySelector('[data-node-id="' + CSS.escape(action.target) + '"]');
        if (target) target.scrollIntoView({ behavior: "smooth" });
        break;
      case "toast":
        toast(action.message);
        break;
    }
  });
})();
"#;
