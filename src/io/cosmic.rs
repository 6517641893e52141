use std::fs;
use std::io;
use std::num;
use std::path::Path;
use std::result;

use crate::record::CosmicRecord;

/// A reader of curated COSMIC mutation-frequency exports.
///
/// The input is tab-delimited with a header line; the keyword column is
/// expected to be precomputed upstream.
pub struct Reader<R: io::Read> {
    inner: csv::Reader<R>,
}

impl Reader<fs::File> {
    /// Read from a given file path.
    pub fn from_file<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        fs::File::open(path).map(Reader::new)
    }
}

impl<R: io::Read> Reader<R> {
    /// Read from a given reader.
    pub fn new(reader: R) -> Self {
        Reader {
            inner: csv::ReaderBuilder::new()
                .delimiter(b'\t')
                .comment(Some(b'#'))
                .has_headers(true)
                .from_reader(reader),
        }
    }

    /// Iterate over records.
    pub fn records(&mut self) -> Records<R> {
        Records { inner: self.inner.records() }
    }
}

pub struct Records<'r, R: io::Read> {
    inner: csv::StringRecordsIter<'r, R>,
}

#[derive(Debug)]
pub enum Error {
    Csv(csv::Error),
    MissingField(String),
    ParseInt(num::ParseIntError),
}

pub type Result<T> = result::Result<T, Error>;

impl<'r, R: io::Read> Iterator for Records<'r, R> {
    type Item = Result<CosmicRecord>;

    /// Get next record.
    fn next(&mut self) -> Option<Result<CosmicRecord>> {
        // StringRecordsIter next() produces doubly wrapped values:
        // Option<csv::Result<StringRecord>>
        // therefore, we need to map twice
        self.inner.next()
            .map(|res| {
                match res {
                    Err(err) => Err(Error::Csv(err)),
                    Ok(record) => Ok( CosmicRecord {
                        id: record.get(0)
                            .ok_or(Error::MissingField("id".to_owned()))
                            .map(String::from)?,
                        chrom: record.get(1)
                            .ok_or(Error::MissingField("chrom".to_owned()))
                            .map(String::from)?,
                        start_position: record.get(2)
                            .ok_or(Error::MissingField("start_position".to_owned()))
                            .and_then(|x| x.parse::<u64>().map_err(Error::ParseInt))?,
                        reference_allele: record.get(3)
                            .ok_or(Error::MissingField("ref".to_owned()))
                            .map(String::from)?,
                        tumor_seq_allele: record.get(4)
                            .ok_or(Error::MissingField("alt".to_owned()))
                            .map(String::from)?,
                        strand: record.get(5)
                            .ok_or(Error::MissingField("strand".to_owned()))
                            .map(String::from)?,
                        cds: record.get(6)
                            .ok_or(Error::MissingField("cds".to_owned()))
                            .map(String::from)?,
                        entrez_gene_id: record.get(7)
                            .ok_or(Error::MissingField("entrez_gene_id".to_owned()))
                            .and_then(|x| x.parse::<i64>().map_err(Error::ParseInt))?,
                        amino_acid_change: record.get(8)
                            .ok_or(Error::MissingField("amino_acid_change".to_owned()))
                            .map(String::from)?,
                        frequency: record.get(9)
                            .ok_or(Error::MissingField("frequency".to_owned()))
                            .and_then(|x| x.parse::<u32>().map_err(Error::ParseInt))?,
                        keyword: record.get(10)
                            .ok_or(Error::MissingField("keyword".to_owned()))
                            .map(String::from)?,
                    }),
                }
            })
    }
}
