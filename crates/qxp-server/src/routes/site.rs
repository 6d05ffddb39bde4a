//! Page shell served at `/`.
//!
//! The shell owns the browser side of the hash router. Every page the site
//! can show is rendered once into the document, together with the table
//! from first segment to page. A `hashchange` selects and swaps the page
//! synchronously, so views always land in the order the fragments changed
//! and navigation never waits on the network.
//!
//! Form drafts live in the browser's `localStorage` under the same
//! `<namespace>_form_<id>` keys as [`DraftStore`](qxp_core::draft::DraftStore),
//! so they stay with the visitor's origin.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::response::Html;
use axum::routing::get;
use serde::Serialize;

use qxp_core::catalog::PERSONAS;
use qxp_core::form::{LEAD_CONFIRMATION_DELAY, NEWSLETTER_CONFIRMATION_DELAY};
use qxp_core::pricing::PricingConfig;
use qxp_core::route::LEGACY_PREFIX;
use qxp_core::router::ENTRY_FRAGMENT;
use qxp_core::view::{NAV, STATIC_PAGES, View};

use crate::error::AppError;
use crate::pages::{self, escape};
use crate::state::AppState;

/// Build the shell router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(shell))
}

async fn shell(State(state): State<Arc<AppState>>) -> Result<Html<String>, AppError> {
    render_shell(&state.pricing, &state.drafts.key(""))
        .map(Html)
        .map_err(|e| AppError::Internal(format!("failed to build page shell: {e}")))
}

/// A pre-rendered page as the shell script sees it.
#[derive(Serialize)]
struct ShellPage {
    title: String,
    html: String,
}

impl ShellPage {
    fn of(view: &View, pricing: &PricingConfig) -> Self {
        let page = pages::render(view, pricing);
        Self {
            title: page.title,
            html: page.html,
        }
    }
}

/// Page key for a persona, as looked up by the shell script.
fn solution_key(slug: &str) -> String {
    format!("solution/{slug}")
}

/// Every page keyed by view id, plus `solution/<slug>` per persona.
fn page_table(pricing: &PricingConfig) -> BTreeMap<String, ShellPage> {
    let fixed = [View::Home, View::NotFound].into_iter().chain(STATIC_PAGES);
    let mut table: BTreeMap<String, ShellPage> = fixed
        .map(|view| (view.id().to_owned(), ShellPage::of(&view, pricing)))
        .collect();
    for persona in &PERSONAS {
        let view = View::Solution {
            slug: persona.slug.to_owned(),
        };
        table.insert(solution_key(persona.slug), ShellPage::of(&view, pricing));
    }
    table
}

/// First segment to view id for the pages addressed by one fixed segment.
fn segment_table() -> BTreeMap<String, &'static str> {
    STATIC_PAGES
        .iter()
        .map(|view| (view.fragment().trim_start_matches("#/").to_owned(), view.id()))
        .collect()
}

/// JSON safe to inline in a `<script>` element.
fn inline_json(value: &impl Serialize) -> Result<String, serde_json::Error> {
    Ok(serde_json::to_string(value)?.replace('<', "\\u003c"))
}

/// Full HTML document for the shell. `draft_prefix` is the storage key of a
/// form draft minus the form id.
///
/// # Errors
///
/// Returns an error if the page table cannot be serialized.
pub fn render_shell(
    pricing: &PricingConfig,
    draft_prefix: &str,
) -> Result<String, serde_json::Error> {
    let mut nav = String::with_capacity(512);
    for link in &NAV {
        nav.push_str("<a href=\"");
        nav.push_str(&escape(link.href));
        nav.push_str("\">");
        nav.push_str(&escape(link.label));
        nav.push_str("</a>");
    }

    let script = SHELL_JS
        .replace("{{ENTRY}}", ENTRY_FRAGMENT)
        .replace("{{LEGACY_PREFIX}}", LEGACY_PREFIX)
        .replace("{{DRAFT_PREFIX}}", &inline_json(&draft_prefix)?)
        .replace(
            "{{LEAD_DELAY_MS}}",
            &LEAD_CONFIRMATION_DELAY.as_millis().to_string(),
        )
        .replace(
            "{{NEWSLETTER_DELAY_MS}}",
            &NEWSLETTER_CONFIRMATION_DELAY.as_millis().to_string(),
        )
        .replace("{{SEGMENTS}}", &inline_json(&segment_table())?)
        .replace("{{PAGES}}", &inline_json(&page_table(pricing))?);

    Ok(SHELL_HTML
        .replace("{{NAV}}", &nav)
        .replace("{{SCRIPT}}", &script))
}

const SHELL_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>QXP</title>
<style>
*{box-sizing:border-box}
body{margin:0;font-family:system-ui,-apple-system,sans-serif;color:#1f2937;background:#f9fafb;line-height:1.5}
header,footer{background:#fff;border-bottom:1px solid #e5e7eb}
footer{border-top:1px solid #e5e7eb;border-bottom:0;margin-top:4rem}
.bar{max-width:72rem;margin:0 auto;padding:1rem;display:flex;gap:1.5rem;align-items:center;flex-wrap:wrap}
.logo{font-weight:800;color:#4f46e5;text-decoration:none;font-size:1.25rem}
nav a{color:#374151;text-decoration:none;margin-right:1rem}
main{max-width:72rem;margin:0 auto;padding:2rem 1rem}
.grid{display:grid;grid-template-columns:repeat(auto-fill,minmax(16rem,1fr));gap:1rem}
.card{display:block;padding:1rem;background:#fff;border:1px solid #e5e7eb;border-radius:.75rem;color:inherit;text-decoration:none}
.btn{display:inline-block;padding:.5rem 1rem;border-radius:.5rem;background:#4f46e5;color:#fff;text-decoration:none}
table.tiers{border-collapse:collapse;margin:1rem 0}
table.tiers td,table.tiers th{padding:.25rem .75rem;border-bottom:1px solid #e5e7eb;text-align:left}
form label{display:block;margin:.75rem 0}
form input,form select,form textarea{display:block;width:100%;max-width:32rem;padding:.5rem;border:1px solid #d1d5db;border-radius:.375rem}
.form-error{color:#b91c1c}
.not-found .code{font-size:4rem;font-weight:800;color:#d1d5db}
</style>
</head>
<body>
<header><div class="bar"><a class="logo" href="#/">QXP</a><nav>{{NAV}}</nav></div></header>
<main id="app" aria-live="polite"></main>
<footer><div class="bar">
<form id="newsletter" novalidate>
<label>Stay in the loop <input type="email" name="email" placeholder="you@school.ac.ke"></label>
<button type="submit">Subscribe</button>
<span class="newsletter-ok" hidden>Subscribed!</span>
</form>
</div></footer>
<script>{{SCRIPT}}</script>
</body>
</html>
"##;

const SHELL_JS: &str = r##"
(function () {
  "use strict";
  var PAGES = {{PAGES}};
  var SEGMENTS = {{SEGMENTS}};
  var LEGACY_PREFIX = "{{LEGACY_PREFIX}}";
  var DRAFT_PREFIX = {{DRAFT_PREFIX}};
  var app = document.getElementById("app");
  var has = Object.prototype.hasOwnProperty;

  function segmentsOf(fragment) {
    var path = fragment.charAt(0) === "#" ? fragment.slice(1) : fragment;
    if (path.charAt(0) === "/") { path = path.slice(1); }
    var q = path.indexOf("?");
    if (q !== -1) { path = path.slice(0, q); }
    var segments = path.split("/").filter(function (s) { return s !== ""; });
    if (segments[0] === LEGACY_PREFIX) { segments.shift(); }
    return segments;
  }

  function pageKey(segments) {
    if (segments.length === 0) { return "home"; }
    if (segments[0] === "solutions" && segments.length > 1) {
      return "solution/" + segments[1];
    }
    return has.call(SEGMENTS, segments[0]) ? SEGMENTS[segments[0]] : "not_found";
  }

  function show(fragment) {
    var key = pageKey(segmentsOf(fragment));
    var page = has.call(PAGES, key) ? PAGES[key] : PAGES.not_found;
    document.title = page.title + " | QXP";
    app.innerHTML = page.html;
    wireQuote();
    wireForms();
  }

  function loadDraft(id) {
    try {
      var raw = window.localStorage.getItem(DRAFT_PREFIX + id);
      var draft = raw ? JSON.parse(raw) : null;
      return draft && typeof draft === "object" ? draft : {};
    } catch (err) {
      console.warn("could not read form draft", id, err);
      return {};
    }
  }

  function saveDraft(id, values) {
    try {
      window.localStorage.setItem(DRAFT_PREFIX + id, JSON.stringify(values));
    } catch (err) {
      console.warn("could not save form draft", id, err);
    }
  }

  function clearDraft(id) {
    try {
      window.localStorage.removeItem(DRAFT_PREFIX + id);
    } catch (err) {
      console.warn("could not clear form draft", id, err);
    }
  }

  function formValues(form) {
    var values = {};
    Array.prototype.forEach.call(form.elements, function (el) {
      if (el.name) { values[el.name] = el.value; }
    });
    return values;
  }

  function wireQuote() {
    var form = app.querySelector("form[data-quote]");
    if (!form) { return; }
    form.addEventListener("input", function () {
      var v = formValues(form);
      var qs = "students=" + encodeURIComponent(v.students || "") +
        "&staff=" + encodeURIComponent(v.staff || "") +
        "&terms=" + encodeURIComponent(v.terms || "");
      fetch("/v1/pricing/quote?" + qs)
        .then(function (res) { return res.json(); })
        .then(function (q) {
          var out = {
            tier: q.tier.label,
            subtotal: q.formatted.subtotal,
            discount: q.formatted.discount_amount,
            total: q.formatted.total
          };
          Object.keys(out).forEach(function (k) {
            var dd = app.querySelector('[data-quote-field="' + k + '"]');
            if (dd) { dd.textContent = out[k]; }
          });
        })
        .catch(function (err) { console.warn("quote refresh failed", err); });
    });
  }

  function wireForms() {
    Array.prototype.forEach.call(app.querySelectorAll("form[data-form]"), function (form) {
      var id = form.getAttribute("data-form");
      var error = form.querySelector(".form-error");
      var done = form.parentNode.querySelector(".confirmation");

      var draft = loadDraft(id);
      Object.keys(draft).forEach(function (name) {
        var el = form.elements.namedItem(name);
        if (el && "value" in el && typeof draft[name] === "string") { el.value = draft[name]; }
      });

      form.addEventListener("input", function () { saveDraft(id, formValues(form)); });

      form.addEventListener("submit", function (ev) {
        ev.preventDefault();
        fetch("/v1/forms/" + encodeURIComponent(id) + "/validate", {
          method: "POST",
          headers: { "content-type": "application/json" },
          body: JSON.stringify(formValues(form))
        })
          .then(function (res) { return res.json().then(function (body) { return [res.ok, body]; }); })
          .then(function (r) {
            if (!r[0]) { error.textContent = r[1].message; error.hidden = false; return; }
            error.hidden = true;
            clearDraft(id);
            form.hidden = true;
            done.hidden = false;
            setTimeout(function () {
              form.reset();
              form.hidden = false;
              done.hidden = true;
            }, {{LEAD_DELAY_MS}});
          })
          .catch(function (err) {
            error.textContent = "Could not send right now. Your answers are saved.";
            error.hidden = false;
            console.warn("form submit failed", err);
          });
      });
    });
  }

  var newsletter = document.getElementById("newsletter");
  newsletter.addEventListener("submit", function (ev) {
    ev.preventDefault();
    var email = newsletter.elements.namedItem("email");
    if (!/^[^\s@]+@[^\s@]+\.[^\s@]+$/.test(email.value.trim())) { return; }
    email.value = "";
    var ok = newsletter.querySelector(".newsletter-ok");
    ok.hidden = false;
    setTimeout(function () { ok.hidden = true; }, {{NEWSLETTER_DELAY_MS}});
  });

  window.addEventListener("hashchange", function () {
    show(location.hash);
    window.scrollTo({ top: 0, behavior: "smooth" });
  });

  if (location.hash === "" || location.hash === "#" || location.hash === "#/") {
    history.replaceState(null, "", "{{ENTRY}}");
  }
  show(location.hash);
})();
"##;
