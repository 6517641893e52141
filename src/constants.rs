pub const COSMIC_TABLE: &str = "cosmic_mutation";

pub const N_BULK_FIELDS: usize = 11;

/// Columns materialized by keyword queries, in select order.
pub const ANNOTATION_COLUMNS: [&str; 5] = [
    "COSMIC_MUTATION_ID",
    "ENTREZ_GENE_ID",
    "PROTEIN_CHANGE",
    "KEYWORD",
    "COUNT",
];
