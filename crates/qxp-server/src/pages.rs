//! Server-side page rendering.
//!
//! Turns a selected [`View`] into the HTML fragment that the shell swaps
//! into `<main>`. Markup is plain; the shell stylesheet does
//! the rest.

use std::fmt::Write as _;

use qxp_core::catalog::{self, DEFAULT_PREVIEW_SLUG, PERSONAS, Persona};
use qxp_core::form::{FieldKind, FormKind};
use qxp_core::pricing::{self, DISCOUNT_TIERS, PricingConfig, PricingInputs, format_money};
use qxp_core::view::View;

/// Calculator inputs shown before the visitor types anything.
pub const SAMPLE_QUOTE: (i64, i64, i64) = (500, 40, 3);

/// A rendered page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Document title.
    pub title: String,
    /// Fragment for `<main>`.
    pub html: String,
    /// The view actually drawn. Differs from the selected view when a
    /// solution slug is not in the catalog.
    pub rendered: &'static str,
}

/// Escape text for use in HTML element content and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Render `view`.
pub fn render(view: &View, pricing: &PricingConfig) -> Page {
    let body = match view {
        View::Home => home(),
        View::SolutionsIndex => solutions_index(),
        View::Solution { slug } => match catalog::persona(slug) {
            Some(persona) => {
                return Page {
                    title: persona.title.to_owned(),
                    html: persona_page(persona),
                    rendered: view.id(),
                };
            }
            None => return not_found_page(),
        },
        View::Pricing => pricing_page(pricing),
        View::Contact => form_page(FormKind::Contact, "We'll respond within 1 business day."),
        View::Demo => form_page(
            FormKind::Demo,
            "See QXP in action with a personalized 20-minute walkthrough.",
        ),
        View::About => section(
            view.title(),
            "<p>QXP is a school management platform built in Nairobi for schools across Kenya: \
             LMS, assessments, communication, finance, library and transport in one place.</p>",
        ),
        View::Testimonials => section(
            view.title(),
            "<blockquote>QXP transformed how we manage our school. The time saved on \
             administrative tasks is incredible.<cite>Principal, Nairobi</cite></blockquote>",
        ),
        View::Faq => section(
            view.title(),
            "<dl><dt>What curricula does QXP support?</dt><dd>CBC, 8-4-4, BNC and IBE.</dd>\
             <dt>How long does implementation take?</dt><dd>Most schools are live within 2-4 weeks.</dd>\
             <dt>Can we try before we buy?</dt><dd>Yes. <a href=\"#/demo\">Book a demo</a>.</dd></dl>",
        ),
        View::Careers => section(
            view.title(),
            "<p>Don't see a role that fits? Send your CV to \
             <a href=\"mailto:careers@qxp.global\">careers@qxp.global</a>.</p>",
        ),
        View::Privacy | View::Terms => legal_page(view.title()),
        View::NotFound => return not_found_page(),
    };

    Page {
        title: view.title().to_owned(),
        html: body,
        rendered: view.id(),
    }
}

fn section(title: &str, inner: &str) -> String {
    format!("<section><h1>{}</h1>{inner}</section>", escape(title))
}

fn list(items: &[&str]) -> String {
    let mut out = String::from("<ul>");
    for item in items {
        let _ = write!(out, "<li>{}</li>", escape(item));
    }
    out.push_str("</ul>");
    out
}

fn persona_card(persona: &Persona) -> String {
    format!(
        "<a class=\"card\" href=\"#/solutions/{slug}\"><h3>{title}</h3><p>{subtitle}</p></a>",
        slug = escape(persona.slug),
        title = escape(persona.title),
        subtitle = escape(persona.subtitle),
    )
}

fn home() -> String {
    let mut html = String::from(
        "<section class=\"hero\"><h1>School management, simplified</h1>\
         <p>One platform for every role in your school.</p>\
         <p><a class=\"btn\" href=\"#/demo\">Book a demo</a> <a class=\"btn\" href=\"#/pricing\">See pricing</a></p></section>",
    );
    if let Some(preview) = catalog::persona(DEFAULT_PREVIEW_SLUG) {
        let _ = write!(
            html,
            "<section class=\"preview\"><h2>{}</h2><p>{}</p>{}</section>",
            escape(preview.title),
            escape(preview.one_liner),
            list(preview.stats),
        );
    }
    html
}

fn solutions_index() -> String {
    let mut html = String::from("<section><h1>Solutions for every role</h1><div class=\"grid\">");
    for persona in &PERSONAS {
        html.push_str(&persona_card(persona));
    }
    html.push_str("</div></section>");
    html
}

fn persona_page(persona: &Persona) -> String {
    format!(
        "<section><h1>{title}</h1><p class=\"lead\">{one_liner}</p>\
         <h2>Pain points we fix</h2>{pains}<h2>What you get</h2>{features}{stats}\
         <p><a class=\"btn\" href=\"#/demo\">Book a demo</a></p></section>",
        title = escape(persona.title),
        one_liner = escape(persona.one_liner),
        pains = list(persona.pains),
        features = list(persona.features),
        stats = list(persona.stats),
    )
}

fn pricing_page(config: &PricingConfig) -> String {
    let (students, staff, terms) = SAMPLE_QUOTE;
    let quote = pricing::calculate(&PricingInputs::new(students, staff, terms), config);

    let mut html = format!(
        "<section><h1>Simple, transparent pricing</h1>\
         <p>{} per user per term. Volume discounts for larger schools.</p><table class=\"tiers\">\
         <tr><th>Users</th><th>Discount</th><th>Tier</th></tr>",
        escape(&format_money(config.price_per_user_per_term, &config.currency)),
    );
    for tier in &DISCOUNT_TIERS {
        let range = match tier.max_users {
            Some(max) => format!("{}–{max}", tier.min_users),
            None => format!("{}+", tier.min_users),
        };
        let _ = write!(
            html,
            "<tr><td>{range}</td><td>{}%</td><td>{}</td></tr>",
            tier.discount_percent,
            escape(tier.label),
        );
    }
    let _ = write!(
        html,
        "</table><form data-quote>\
         <label>Students <input name=\"students\" inputmode=\"numeric\" value=\"{students}\"></label>\
         <label>Teachers &amp; staff <input name=\"staff\" inputmode=\"numeric\" value=\"{staff}\"></label>\
         <label>Terms per year <input name=\"terms\" inputmode=\"numeric\" value=\"{terms}\"></label>\
         </form><dl class=\"quote\">\
         <dt>Pricing tier</dt><dd data-quote-field=\"tier\">{tier}</dd>\
         <dt>Subtotal</dt><dd data-quote-field=\"subtotal\">{subtotal}</dd>\
         <dt>Discount</dt><dd data-quote-field=\"discount\">{discount}</dd>\
         <dt>Total per year</dt><dd data-quote-field=\"total\">{total}</dd></dl></section>",
        tier = escape(quote.tier.label),
        subtotal = escape(&format_money(quote.subtotal, &config.currency)),
        discount = escape(&format_money(quote.discount_amount, &config.currency)),
        total = escape(&format_money(quote.total, &config.currency)),
    );
    html
}

fn form_page(kind: FormKind, subtitle: &str) -> String {
    let title = match kind {
        FormKind::Contact => View::Contact.title(),
        FormKind::Demo => View::Demo.title(),
    };
    let mut html = format!(
        "<section><h1>{}</h1><p>{}</p><form data-form=\"{}\" novalidate>",
        escape(title),
        escape(subtitle),
        kind.id(),
    );
    for field in kind.fields() {
        let required = if field.required { " required" } else { "" };
        let label = escape(field.label);
        let name = field.name;
        let control = match field.kind {
            FieldKind::LongText => format!("<textarea name=\"{name}\"{required}></textarea>"),
            FieldKind::Choice(options) => {
                let mut select =
                    format!("<select name=\"{name}\"{required}><option value=\"\"></option>");
                for option in options {
                    let _ = write!(select, "<option value=\"{0}\">{0}</option>", escape(option));
                }
                select.push_str("</select>");
                select
            }
            other => {
                let input_type = match other {
                    FieldKind::Email => "email",
                    FieldKind::Phone => "tel",
                    FieldKind::Date => "date",
                    FieldKind::Time => "time",
                    _ => "text",
                };
                format!("<input type=\"{input_type}\" name=\"{name}\"{required}>")
            }
        };
        let _ = write!(html, "<label>{label}{control}</label>");
    }
    html.push_str(
        "<p class=\"form-error\" hidden></p><button type=\"submit\">Send</button></form>\
         <div class=\"confirmation\" hidden><h2>Thank you!</h2><p>We'll be in touch shortly.</p></div></section>",
    );
    html
}

fn legal_page(title: &str) -> String {
    let lower = escape(&title.to_lowercase());
    section(
        title,
        &format!(
            "<p>This is a placeholder for our {lower}.</p>\
             <p>Questions about our {lower}? Email <a href=\"mailto:legal@qxp.global\">legal@qxp.global</a> \
             or use the <a href=\"#/contact\">contact form</a>.</p>"
        ),
    )
}

fn not_found_page() -> Page {
    Page {
        title: View::NotFound.title().to_owned(),
        html: "<section class=\"not-found\"><div class=\"code\">404</div><h1>Page not found</h1>\
               <p>The page you're looking for doesn't exist or has been moved.</p>\
               <p><a class=\"btn\" href=\"#/\">Go home</a> <a class=\"btn\" href=\"#/contact\">Contact support</a></p></section>"
            .to_owned(),
        rendered: View::NotFound.id(),
    }
}
