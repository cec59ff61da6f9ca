//! Example: counter with increment and decrement buttons
//!
//! There is no real host event loop here, so clicks are simulated by
//! calling `Document::on_event` the way a host would.

use std::cell::Cell;
use std::rc::Rc;

use anyhow::Context;
use fos_widgets::kind::{Button, Div};
use fos_widgets::{Config, Document, Handle};

fn update_result(doc: &Document, count: i32) {
    match Handle::<Div>::from_id(doc, "result") {
        Ok(result) => {
            if let Err(err) = result.text(&count.to_string()) {
                tracing::warn!("could not update result: {}", err);
            }
        }
        Err(err) => tracing::warn!("result lookup failed: {}", err),
    }
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let config: Config = serde_json::from_str(r#"{ "title": "Hello", "max_nodes": 64 }"#)
        .context("invalid document config")?;
    let doc = Document::with_config(config);
    let count = Rc::new(Cell::new(0));

    println!("fOS Widgets v{}", fos_widgets::VERSION);

    let div = doc.create::<Div>()?;

    let inc = doc.create::<Button>()?;
    inc.text("Increment!")?;
    inc.style("color", "green")?;
    let counter = Rc::clone(&count);
    inc.handle("click", move |doc, _| {
        counter.set(counter.get() + 1);
        update_result(doc, counter.get());
    })?;
    div.append(inc)?;

    let dec = doc.create::<Button>()?;
    dec.text("Decrement!")?;
    dec.style("color", "red")?;
    let counter = Rc::clone(&count);
    dec.handle("click", move |doc, _| {
        counter.set(counter.get() - 1);
        update_result(doc, counter.get());
    })?;
    div.append(dec)?;

    let result = doc.create::<Div>()?;
    result.id("result")?;
    result.text("0")?;
    result.style("fontSize", "22px")?;

    for elem in doc.elems_by_tag("BUTTON") {
        elem.style("fontSize", "22px")?;
    }

    println!("{}: result = {}", doc.current_title(), result.text_content()?);
    for (button, label) in [(inc, "increment"), (inc, "increment"), (dec, "decrement")] {
        let outcome = doc.on_event(button.node_id(), "click");
        println!("{} -> {:?}, result = {}", label, outcome, result.text_content()?);
    }

    Ok(())
}
