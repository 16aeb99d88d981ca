//! In-process stand-ins for the alignment engines.

use crate::aligners::{
    AlignedRow, ArtifactToken, MsaProfile, MultipleAligner, MultipleAlignment, GAP,
};
use crate::strcon::LocusError;
use bio::alignment::pairwise::{Aligner, Scoring};
use bio::alignment::AlignmentOperation;
use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct MsaRequest {
    pub labels: Vec<String>,
    pub seqs: Vec<String>,
    pub profile: MsaProfile,
    pub token: ArtifactToken,
}

/// Replays queued responses; once the queue is empty it aligns on its own:
/// two sequences pairwise (second fully inside the first), equal-length
/// sequences column by column.
#[derive(Debug, Default)]
pub struct ScriptedMsa {
    responses: VecDeque<Result<MultipleAlignment, LocusError>>,
    requests: Vec<MsaRequest>,
}

impl ScriptedMsa {
    pub fn with_responses(responses: Vec<Result<MultipleAlignment, LocusError>>) -> Self {
        ScriptedMsa {
            responses: responses.into(),
            requests: Vec::new(),
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.len()
    }

    pub fn requests(&self) -> &[MsaRequest] {
        &self.requests
    }
}

impl MultipleAligner for ScriptedMsa {
    fn align(
        &mut self,
        seqs: &[(String, &str)],
        profile: MsaProfile,
        token: &ArtifactToken,
    ) -> Result<MultipleAlignment, LocusError> {
        self.requests.push(MsaRequest {
            labels: seqs.iter().map(|(label, _)| label.clone()).collect(),
            seqs: seqs.iter().map(|(_, seq)| seq.to_string()).collect(),
            profile,
            token: token.clone(),
        });

        if let Some(response) = self.responses.pop_front() {
            return response;
        }

        match seqs {
            [(label1, seq1), (label2, seq2)] if seq1.len() != seq2.len() || profile == MsaProfile::Reference => {
                let (row1, row2) = align_inside(seq1.as_bytes(), seq2.as_bytes());
                Ok(MultipleAlignment {
                    rows: vec![
                        AlignedRow {
                            label: label1.clone(),
                            residues: row1,
                        },
                        AlignedRow {
                            label: label2.clone(),
                            residues: row2,
                        },
                    ],
                })
            }
            _ if seqs.iter().all(|(_, seq)| seq.len() == seqs[0].1.len()) => Ok(MultipleAlignment {
                rows: seqs
                    .iter()
                    .map(|(label, seq)| AlignedRow {
                        label: label.clone(),
                        residues: seq.as_bytes().to_vec(),
                    })
                    .collect(),
            }),
            _ => Err(LocusError::EngineFailure {
                engine: "scripted".to_string(),
                reason: "no scripted response".to_string(),
            }),
        }
    }
}

/// Aligns all of `inner` against `outer`, leaving the ends of `outer` free.
fn align_inside(outer: &[u8], inner: &[u8]) -> (Vec<u8>, Vec<u8>) {
    let scoring = Scoring::from_scores(-5, -1, 1, -1).yclip(0);
    let mut aligner = Aligner::with_scoring(scoring);
    let alignment = aligner.custom(inner, outer);

    let (mut outer_row, mut inner_row) = (Vec::new(), Vec::new());
    fn push_overhang(bases: &[u8], outer_row: &mut Vec<u8>, inner_row: &mut Vec<u8>) {
        outer_row.extend_from_slice(bases);
        inner_row.extend(std::iter::repeat(GAP).take(bases.len()));
    }

    let (mut x, mut y) = (0, alignment.ystart);
    push_overhang(&outer[..y], &mut outer_row, &mut inner_row);
    for op in &alignment.operations {
        match *op {
            AlignmentOperation::Match | AlignmentOperation::Subst => {
                inner_row.push(inner[x]);
                outer_row.push(outer[y]);
                x += 1;
                y += 1;
            }
            AlignmentOperation::Del => {
                inner_row.push(GAP);
                outer_row.push(outer[y]);
                y += 1;
            }
            AlignmentOperation::Ins => {
                inner_row.push(inner[x]);
                outer_row.push(GAP);
                x += 1;
            }
            AlignmentOperation::Xclip(_) | AlignmentOperation::Yclip(_) => {}
        }
    }
    push_overhang(&outer[y..], &mut outer_row, &mut inner_row);
    (outer_row, inner_row)
}
