pub type Pos = u64;

/// A curated COSMIC mutation-frequency annotation.
///
/// Records are created only through batched ingestion and are immutable once
/// stored; the only destructive operation is a full-table wipe.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CosmicRecord {
    /// COSMIC mutation ID; unique per source entry, not per table
    pub id: String,
    /// Chromosome or contig name
    pub chrom: String,
    /// Genomic start position
    pub start_position: Pos,
    /// Reference allele
    pub reference_allele: String,
    /// Observed allele in the tumor sample
    pub tumor_seq_allele: String,
    /// Genomic strand
    pub strand: String,
    /// Change in coding-sequence notation
    pub cds: String,
    /// Entrez gene ID
    pub entrez_gene_id: i64,
    /// Amino-acid change (e.g. V600E); may be empty
    pub amino_acid_change: String,
    /// Number of independent observations in COSMIC
    pub frequency: u32,
    /// Normalized join key, typically derived from gene and amino-acid change;
    /// shared by all records of one mutation class
    pub keyword: String,
}

impl CosmicRecord {
    /// Render the record as the ordered text fields consumed by the bulk
    /// sink. The layout is fixed: id, chromosome, start position, reference
    /// allele, observed allele, strand, cds change, entrez gene id,
    /// amino-acid change, frequency, keyword.
    pub fn bulk_fields(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.chrom.clone(),
            self.start_position.to_string(),
            self.reference_allele.clone(),
            self.tumor_seq_allele.clone(),
            self.strand.clone(),
            self.cds.clone(),
            self.entrez_gene_id.to_string(),
            self.amino_acid_change.clone(),
            self.frequency.to_string(),
            self.keyword.clone(),
        ]
    }
}
