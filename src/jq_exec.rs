//! jq pre-filtering of input documents (via jaq).
use anyhow::{anyhow, Context, Result};
use jaq_core::{load, Compiler, Ctx, RcIter};
use jaq_json::Val;
use serde_json::Value;

/// Run `filter_src` over `input`, returning every output as a JSON value.
pub fn run_jaq(filter_src: &str, input: &Value) -> Result<Vec<Value>> {
    let loader = load::Loader::new(jaq_std::defs().chain(jaq_json::defs()));
    let arena = load::Arena::default();
    let program = load::File { code: filter_src, path: () };

    let modules = loader
        .load(&arena, program)
        .map_err(|errs| {
            let reasons: Vec<String> = errs.iter().map(|(_, err)| format!("{err:?}")).collect();
            anyhow!(reasons.join("; "))
        })
        .with_context(|| format!("cannot parse jq filter `{filter_src}`"))?;

    let filter = Compiler::default()
        .with_funs(jaq_std::funs().chain(jaq_json::funs()))
        .compile(modules)
        .map_err(|errs| {
            let names: Vec<String> = errs
                .iter()
                .flat_map(|(_, undefined)| undefined.iter().map(|(name, what)| format!("`{name}` ({what:?})")))
                .collect();
            anyhow!("undefined {}", names.join(", "))
        })
        .with_context(|| format!("cannot compile jq filter `{filter_src}`"))?;

    let inputs = RcIter::new(core::iter::empty());
    let outputs = filter.run((Ctx::new([], &inputs), Val::from(input.clone())));

    let mut out = Vec::new();
    for (i, item) in outputs.enumerate() {
        let v = item.map_err(|e| anyhow!("jq runtime error: {e:?}"))?;
        // Val prints as JSON text
        let value = serde_json::from_str::<Value>(&v.to_string())
            .with_context(|| format!("jq output #{i} is not valid JSON"))?;
        out.push(value);
    }
    tracing::trace!(filter = filter_src, outputs = out.len(), "jq filter applied");
    Ok(out)
}
