use crate::output::{print_json, Table};
use ontology_core::tools::Dialect;

pub fn run(json: bool) -> anyhow::Result<()> {
    if json {
        let list: Vec<serde_json::Value> = Dialect::all()
            .iter()
            .map(|d| {
                serde_json::json!({
                    "name": d.as_str(),
                    "governance": d.carries_governance(),
                    "description": d.describe(),
                })
            })
            .collect();
        return print_json(&list);
    }

    let mut table = Table::new(&["DIALECT", "GOVERNANCE", "DESCRIPTION"]);
    for d in Dialect::all() {
        let governance = if d.carries_governance() { "carried" } else { "dropped" };
        table.row([d.as_str(), governance, d.describe()]);
    }
    table.print();
    Ok(())
}
