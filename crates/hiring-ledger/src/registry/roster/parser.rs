use serde::{Deserialize, Deserializer};
use std::io::Read;

#[derive(Debug, Deserialize)]
pub(crate) struct ApplicantRow {
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) skills: String,
    #[serde(default)]
    pub(crate) phone: String,
    #[serde(default)]
    pub(crate) email: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) preference: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct JobRow {
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) description: String,
    pub(crate) salary: u64,
}

pub(crate) fn parse_applicant_rows<R: Read>(reader: R) -> Result<Vec<ApplicantRow>, csv::Error> {
    parse_rows(reader)
}

pub(crate) fn parse_job_rows<R: Read>(reader: R) -> Result<Vec<JobRow>, csv::Error> {
    parse_rows(reader)
}

fn parse_rows<R, T>(reader: R) -> Result<Vec<T>, csv::Error>
where
    R: Read,
    T: for<'de> Deserialize<'de>,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    csv_reader.deserialize::<T>().collect()
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
