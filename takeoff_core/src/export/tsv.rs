use crate::fmt::{format_decimal, format_optional_decimal};
use crate::quantities::QuantityTable;

const HEADER: [&str; 5] = ["category", "profile", "count", "total_length_m", "total_kg"];

/// Tab-separated quantity table with a trailing TOTAL row.
///
/// Numbers carry no thousands separators; unknown masses are written as `-`.
pub fn to_tsv(table: &QuantityTable) -> String {
    let mut lines = Vec::with_capacity(table.rows.len() + 2);
    lines.push(HEADER.join("\t"));

    for row in &table.rows {
        lines.push(
            [
                row.category.clone(),
                row.profile.clone(),
                row.count.to_string(),
                format_decimal(row.length_m, 3),
                format_optional_decimal(row.mass_kg, 3),
            ]
            .join("\t"),
        );
    }

    lines.push(
        [
            "TOTAL".to_string(),
            String::new(),
            table.totals.count.to_string(),
            format_decimal(table.totals.length_m, 3),
            format_optional_decimal(table.totals.mass_kg, 3),
        ]
        .join("\t"),
    );

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::members::MemberRole;
    use crate::quantities::{QuantityRow, Totals};

    #[test]
    fn test_tsv_layout() {
        let table = QuantityTable {
            rows: vec![
                QuantityRow {
                    role: MemberRole::Column,
                    category: "COLUMN".into(),
                    profile: "H-300x300x10x15".into(),
                    count: 9,
                    length_m: 75.6,
                    mass_kg: Some(7106.4),
                },
                QuantityRow {
                    role: MemberRole::Brace,
                    category: "BRACE".into(),
                    profile: "T-100".into(),
                    count: 2,
                    length_m: 14.422,
                    mass_kg: None,
                },
            ],
            totals: Totals {
                count: 11,
                length_m: 90.022,
                mass_kg: Some(7106.4),
                mass_t: Some(7.1064),
            },
        };
        let tsv = to_tsv(&table);
        let lines: Vec<&str> = tsv.lines().collect();
        assert_eq!(lines[0], "category\tprofile\tcount\ttotal_length_m\ttotal_kg");
        assert_eq!(lines[1], "COLUMN\tH-300x300x10x15\t9\t75.6\t7106.4");
        assert_eq!(lines[2], "BRACE\tT-100\t2\t14.422\t-");
        assert_eq!(lines[3], "TOTAL\t\t11\t90.022\t7106.4");
    }

    #[test]
    fn test_empty_table() {
        let tsv = to_tsv(&QuantityTable::default());
        assert_eq!(tsv, "category\tprofile\tcount\ttotal_length_m\ttotal_kg\nTOTAL\t\t0\t0\t-");
    }
}
