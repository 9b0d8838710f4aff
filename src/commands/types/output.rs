//! Output formatting for types command results.

use crate::generator::GenerateReport;
use crate::output::{Outputable, push_section};

impl Outputable for GenerateReport {
    fn to_table(&self) -> String {
        let mut output = String::new();

        output.push_str("GraphQL Types Summary:\n");
        output.push_str(&format!("  Entities: {}\n", self.entities_found));
        output.push_str(&format!("  Generated: {}\n", self.generated_types.len()));
        output.push_str(&format!("  Written: {}\n", self.written.len()));
        output.push_str(&format!("  Kept: {}\n", self.skipped_files.len()));
        output.push_str(&format!("  Failed: {}\n", self.failures.len()));

        push_section(&mut output, "Written", &self.written);
        push_section(&mut output, "Kept existing", &self.skipped_files);
        push_section(&mut output, "Skipped entities", &self.skipped_entities);
        push_section(
            &mut output,
            "Unsupported fields",
            self.unsupported_fields
                .iter()
                .map(|f| format!("{}::{} ({})", f.entity, f.field, f.kind)),
        );
        push_section(
            &mut output,
            "Failed",
            self.failures
                .iter()
                .map(|f| format!("{}: {}", f.path, f.message)),
        );

        output
    }
}
