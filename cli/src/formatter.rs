use aspire::{AtomValue, Atoms, ShapedAnswer, Term};
use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, Row, Table};

pub struct Formatter {}

impl Default for Formatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter {
    pub fn new() -> Self {
        Self {}
    }

    /// One model: a header line, then a table per predicate or one atom per line
    pub fn format_answer(&self, answer: &ShapedAnswer) -> String {
        let mut output = format!("Answer: {}", answer.index);
        if let Some(cost) = &answer.cost {
            let cost: Vec<String> = cost.iter().map(|c| c.to_string()).collect();
            output.push_str(&format!(" (cost {})", cost.join(" ")));
        }
        output.push('\n');

        match &answer.atoms {
            Atoms::Grouped(groups) => {
                if !groups.is_empty() {
                    output.push_str(&self.format_groups_table(groups));
                    output.push('\n');
                }
            }
            Atoms::Flat(atoms) => {
                for atom in atoms {
                    output.push_str(&format!("  {}\n", atom));
                }
            }
        }
        output
    }

    fn format_groups_table(
        &self,
        groups: &std::collections::BTreeMap<String, Vec<AtomValue>>,
    ) -> String {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(Row::from(vec![
            Cell::new("Predicate").set_alignment(CellAlignment::Left),
            Cell::new("Values").set_alignment(CellAlignment::Left),
        ]));

        for (predicate, values) in groups {
            let rendered: Vec<String> = values.iter().map(|v| self.format_value(v)).collect();
            table.add_row(Row::from(vec![predicate.clone(), rendered.join("\n")]));
        }

        table.to_string()
    }

    fn format_value(&self, value: &AtomValue) -> String {
        match value {
            AtomValue::Bare => "-".to_string(),
            AtomValue::First(None) => "-".to_string(),
            other => other.to_string(),
        }
    }

    /// Terms of one line, one per row
    pub fn format_terms(&self, terms: &[Term]) -> String {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(Row::from(vec![
            Cell::new("Term"),
            Cell::new("Predicate"),
            Cell::new("Arity").set_alignment(CellAlignment::Right),
        ]));

        for term in terms {
            table.add_row(Row::from(vec![
                Cell::new(term.to_string()),
                Cell::new(term.predicate()),
                Cell::new(term.arity()).set_alignment(CellAlignment::Right),
            ]));
        }

        format!("{}\n", table)
    }
}
