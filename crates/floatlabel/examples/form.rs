//! Example: floating labels on a parsed sign-in form
//!
//! Run with `RUST_LOG=floatlabel=trace` to watch the scan and listener activity.

use floatlabel::LabelSynchronizer;
use floatlabel_html::HtmlSerializer;
use serde_json::json;
use tracing_subscriber::EnvFilter;

const FORM: &str = r#"
<form id="sign-in">
  <label for="user">Username</label>
  <input id="user" type="text" value="ada">
  <label for="pass">Password</label>
  <input id="pass" type="password">
</form>
"#;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut document = floatlabel_html::parse(FORM)?;
    let labels = LabelSynchronizer::new();
    labels.init(&mut document, &json!({ "floatingClassName": "floating", "delegateEvents": true }))?;
    document.finish_parsing();

    let form = document
        .get_element_by_id("sign-in")
        .ok_or_else(|| anyhow::anyhow!("form missing"))?;
    let serializer = HtmlSerializer::pretty();
    println!("After load:\n{}\n", serializer.serialize_outer(document.tree(), form));

    let pass = document
        .get_element_by_id("pass")
        .ok_or_else(|| anyhow::anyhow!("password input missing"))?;
    document.edit_control(pass, "hunter2")?;
    println!("After typing a password:\n{}", serializer.serialize_outer(document.tree(), form));

    Ok(())
}
