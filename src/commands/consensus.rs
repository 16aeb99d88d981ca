use crate::aligners::{ClustalAligner, ClustalConfig, EndGapFreeAligner};
use crate::cli::ConsensusArgs;
use crate::strcon::{
    locus::{stream_loci_into_channel, Locus},
    workflows::{analyze_locus, LocusResult},
    writers::TsvWriter,
    ConsensusParams,
};
use crate::utils::{create_writer, Result};
use crossbeam_channel::{bounded, Sender};
use rayon::{
    iter::{ParallelBridge, ParallelIterator},
    ThreadPoolBuilder,
};
use std::{
    cell::RefCell,
    sync::Arc,
    thread::{self},
    time::Duration,
};

#[derive(Debug, Clone)]
struct ThreadContextParams {
    clustal: ClustalConfig,
}

thread_local! {
    static CTX_PARAMS: RefCell<Option<ThreadContextParams>> = const { RefCell::new(None) };
}

fn create_thread_local_msa() -> ClustalAligner {
    let config = CTX_PARAMS.with(|ctx_cell| {
        ctx_cell
            .borrow()
            .as_ref()
            .expect("Thread context parameters not initialized for multiple aligner")
            .clustal
            .clone()
    });
    ClustalAligner::new(config)
}

thread_local! {
    // Read-vs-read similarity
    static THREAD_PAIRWISE: RefCell<EndGapFreeAligner> = RefCell::new(EndGapFreeAligner::new());
    // Consensus and reference alignment
    static THREAD_MSA: RefCell<ClustalAligner> = RefCell::new(create_thread_local_msa());
}

const CHANNEL_BUFFER_SIZE: usize = 2048;

pub fn consensus(args: ConsensusArgs) -> Result<()> {
    let mut tsv_writer = create_writer(&args.output_prefix, "consensus.tsv", TsvWriter::new)?;

    let (sender_locus, receiver_locus) = bounded(CHANNEL_BUFFER_SIZE);
    let loci_path = args.loci_path.clone();
    let locus_stream_thread =
        thread::spawn(move || stream_loci_into_channel(&loci_path, sender_locus));

    let (sender_result, receiver_result) = bounded::<(Locus, LocusResult)>(CHANNEL_BUFFER_SIZE);
    let writer_thread = thread::spawn(move || -> Result<usize> {
        let mut num_written = 0;
        for (locus, result) in &receiver_result {
            tsv_writer.write(&locus, &result)?;
            num_written += 1;
        }
        tsv_writer.flush()?;
        Ok(num_written)
    });

    let params = Arc::new(ConsensusParams {
        min_similarity: args.min_similarity,
        max_distance: args.max_distance,
        flank_padding: args.flank_padding,
        gap_vote: args.gap_vote,
        ..ConsensusParams::default()
    });

    log::debug!(
        "Initializing thread pool with {} threads...",
        args.num_threads
    );

    let pool = initialize_thread_pool(
        args.num_threads,
        ThreadContextParams {
            clustal: ClustalConfig {
                executable: args.clustalw_path.clone(),
                timeout: Duration::from_secs(args.engine_timeout),
                work_dir: args.work_dir.clone(),
            },
        },
    )?;
    pool.install(|| {
        receiver_locus
            .into_iter()
            .par_bridge()
            .for_each_with(&sender_result, |s, locus_result| match locus_result {
                Ok(locus) => process_locus(locus, &params, s),
                Err(err) => log::error!("Locus processing: {:#}", err),
            });
    });

    // Clean-up
    drop(sender_result);
    let writer_outcome = writer_thread.join().expect("Writer thread panicked");
    log::trace!("Writer thread finished");
    locus_stream_thread
        .join()
        .expect("Locus stream thread panicked")
        .map_err(|e| format!("Locus streaming failed: {}", e))?;
    log::trace!("Locus stream thread finished");

    let num_written = writer_outcome?;
    log::info!("Wrote consensus for {} loci", num_written);
    Ok(())
}

fn process_locus(
    locus: Locus,
    params: &Arc<ConsensusParams>,
    sender_result: &Sender<(Locus, LocusResult)>,
) {
    let outcome = THREAD_PAIRWISE.with(|pairwise_cell| {
        THREAD_MSA.with(|msa_cell| {
            let mut pairwise = pairwise_cell.borrow_mut();
            let mut msa = msa_cell.borrow_mut();
            analyze_locus(&locus, params, &mut *pairwise, &mut *msa)
        })
    });

    match outcome {
        Ok(result) => {
            if let Err(e) = sender_result.send((locus, result)) {
                log::error!("Failed to send locus result to writer thread: {}", e);
            }
        }
        Err(err) => {
            log::error!("Error analyzing locus {}: {}", locus.id, err);
        }
    }
}

fn initialize_thread_pool(
    num_threads: usize,
    thread_context: ThreadContextParams,
) -> Result<rayon::ThreadPool> {
    ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .thread_name(|i| format!("strcon-{}", i))
        .start_handler(move |_thread_index| {
            CTX_PARAMS.with(|cell| {
                *cell.borrow_mut() = Some(thread_context.clone());
            });
            log::trace!("Initialized thread {:?}", std::thread::current().id());
        })
        .exit_handler(|_thread_index| {
            CTX_PARAMS.with(|cell| {
                *cell.borrow_mut() = None;
            });
        })
        .build()
        .map_err(|e| format!("Failed to initialize thread pool: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strcon::GapVotePolicy;
    use std::{fs, path::Path};

    fn args(loci_path: &Path, output_prefix: &Path) -> ConsensusArgs {
        ConsensusArgs {
            loci_path: loci_path.to_path_buf(),
            output_prefix: output_prefix.to_string_lossy().into_owned(),
            num_threads: 1,
            clustalw_path: "/nonexistent/clustalw2".into(),
            engine_timeout: 5,
            work_dir: None,
            min_similarity: 0.85,
            max_distance: 0.05,
            flank_padding: 15,
            gap_vote: GapVotePolicy::Exclude,
        }
    }

    #[test]
    fn corrupt_gzip_input_fails_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let loci_path = dir.path().join("loci.tsv.gz");
        fs::write(&loci_path, b"this is not gzip data\n").unwrap();
        let result = consensus(args(&loci_path, &dir.path().join("out")));
        assert!(result.is_err());
    }

    #[test]
    fn failed_loci_are_left_out_of_the_report() {
        let dir = tempfile::tempdir().unwrap();
        let loci_path = dir.path().join("loci.tsv");
        fs::write(
            &loci_path,
            "# locus table\nL1\t0\t0\tGATTACAGGCTTACGCAGTCCGATGGAACTTGA\tCAG:0:0\n",
        )
        .unwrap();
        let prefix = dir.path().join("out");
        consensus(args(&loci_path, &prefix)).unwrap();

        let report = fs::read_to_string(dir.path().join("out.consensus.tsv")).unwrap();
        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("#locus_id"));
    }
}
