//! FASTA records as served by `rcsb.org/fasta/entry/<id>`.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

static CHAIN_PREFIX: OnceLock<Regex> = OnceLock::new();

/// One sequence of a FASTA file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FastaSequence {
    /// Polymer entity id, e.g. `6TML_1`
    pub entity_id: String,

    /// Chains sharing this sequence
    pub chains: Vec<String>,

    pub sequence: String,

    /// Header line without the leading `>`
    pub fasta_header: String,
}

/// Parse RCSB FASTA text, one record per `>` header.
///
/// Headers look like `6TML_1|Chains Q7,Q8|ATPTG11|Toxoplasma gondii`.
/// Sequence lines are concatenated. Text before the first header is ignored.
pub fn parse_fasta(text: &str) -> Vec<FastaSequence> {
    let prefix =
        CHAIN_PREFIX.get_or_init(|| Regex::new(r"Chains? ").expect("chain prefix pattern is valid"));

    text.trim()
        .split('>')
        .skip(1)
        .filter_map(|chunk| {
            let mut lines = chunk.lines();
            let header = lines.next()?.trim_end().to_string();
            let sequence: String = lines.map(str::trim).collect();

            let mut segments = header.split('|');
            let entity_id = segments.next()?.trim().to_string();
            let chains = segments
                .next()
                .map(|segment| {
                    prefix
                        .replace_all(segment, "")
                        .split(',')
                        .map(|c| c.trim().to_string())
                        .filter(|c| !c.is_empty())
                        .collect()
                })
                .unwrap_or_default();

            Some(FastaSequence {
                entity_id,
                chains,
                sequence,
                fasta_header: header,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "
>6TML_1|Chains Q7,Q8,Q9,q7,q8,q9|ATPTG11|Toxoplasma gondii (strain ATCC 50853 / GT1) (507601)
MVRNQRYPASPVQEIFLPEPVPFVQFDQTAPSPNSPPAPLPSPSLSQCEEQKDRYR
>6TML_2|Chain i9|ATPTG7|Toxoplasma gondii (strain ATCC 50853 / GT1) (507601)
MPSSSSEDAQGGNRFECVSNSTSPRRKNATKDEAACLQPRRSAVSGPREDVLCIR
>6TML_32|Chains H1,H2,H3,H4|subunit c|Toxoplasma gondii (strain ATCC 50853 / GT1) (507601)
MFFSRLSLSALKAAPAREAL";

    #[test]
    fn test_parse_fasta_records() {
        let records = parse_fasta(SAMPLE);
        assert_eq!(records.len(), 3);

        assert_eq!(records[0].entity_id, "6TML_1");
        assert_eq!(records[0].chains, vec!["Q7", "Q8", "Q9", "q7", "q8", "q9"]);
        assert_eq!(
            records[0].sequence,
            "MVRNQRYPASPVQEIFLPEPVPFVQFDQTAPSPNSPPAPLPSPSLSQCEEQKDRYR"
        );
        assert_eq!(
            records[0].fasta_header,
            "6TML_1|Chains Q7,Q8,Q9,q7,q8,q9|ATPTG11|Toxoplasma gondii (strain ATCC 50853 / GT1) (507601)"
        );

        assert_eq!(records[1].chains, vec!["i9"]);
        assert_eq!(records[2].entity_id, "6TML_32");
        assert_eq!(records[2].sequence, "MFFSRLSLSALKAAPAREAL");
    }

    #[test]
    fn test_multiline_sequence_joined() {
        let records = parse_fasta(">4HHB_1|Chains A, C|Hemoglobin\r\nVLSPADK\r\nTNVKAAW\r\n");
        assert_eq!(records[0].chains, vec!["A", "C"]);
        assert_eq!(records[0].sequence, "VLSPADKTNVKAAW");
        assert_eq!(records[0].fasta_header, "4HHB_1|Chains A, C|Hemoglobin");
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_fasta("").is_empty());
        assert!(parse_fasta("no header here").is_empty());
    }
}
