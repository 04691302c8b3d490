//! Subcommand implementations: table in, core pass, table out.

use anyhow::Context;
use tracing::info;

use annot_media::{detect_silence, extract_matched_segments, extract_segments, ExtractConfig, SilenceConfig};
use annot_segments::{
    filter_frames, match_speakers, merge_intervals, read_matched_segments, read_scored_frames,
    read_segments, read_turns, write_matched_segments, write_segments, FilterConfig,
    MalformedPolicy, MergeConfig,
};

use crate::cli::{DetectSilenceArgs, ExtractArgs, FilterArgs, MatchSpeakersArgs};

fn policy(skip_malformed: bool) -> MalformedPolicy {
    if skip_malformed {
        MalformedPolicy::Skip
    } else {
        MalformedPolicy::Fail
    }
}

/// `annot filter`: scored frames → filter → merge → good segments table.
pub fn filter(args: FilterArgs) -> anyhow::Result<()> {
    let frames = read_scored_frames(&args.input_file, policy(args.skip_malformed))
        .with_context(|| format!("reading {}", args.input_file.display()))?;

    let filter_config = FilterConfig {
        music_min_threshold: args.music_min_threshold,
        music_max_threshold: args.music_max_threshold,
        speech_min_threshold: args.speech_min_threshold,
        speech_max_threshold: args.speech_max_threshold,
    };
    let raw = filter_frames(&frames, args.filter_type, &filter_config)?;

    let merge_config = MergeConfig {
        max_gap: args.max_gap,
        min_duration: args.min_duration,
    };
    let merged = merge_intervals(&raw, &merge_config)?;

    write_segments(&args.output_file, &merged)
        .with_context(|| format!("writing {}", args.output_file.display()))?;

    info!(
        input = %args.input_file.display(),
        output = %args.output_file.display(),
        mode = %args.filter_type,
        segments = merged.len(),
        "Grouped segments saved"
    );
    Ok(())
}

/// `annot match-speakers`: good segments × diarization turns → matched table.
pub fn match_speakers_cmd(args: MatchSpeakersArgs) -> anyhow::Result<()> {
    let policy = policy(args.skip_malformed);

    let good = read_segments(&args.good_segments_file, policy)
        .with_context(|| format!("reading {}", args.good_segments_file.display()))?;
    let turns = read_turns(&args.diarization_file, policy)
        .with_context(|| format!("reading {}", args.diarization_file.display()))?;

    let matched = match_speakers(&good, &turns)?;

    write_matched_segments(&args.output_file, &matched)
        .with_context(|| format!("writing {}", args.output_file.display()))?;

    info!(
        segments = good.len(),
        turns = turns.len(),
        matched = matched.len(),
        output = %args.output_file.display(),
        "Matched segments with speakers saved"
    );
    Ok(())
}

/// `annot extract`: cut each segment out of the recording via FFmpeg.
pub async fn extract(args: ExtractArgs) -> anyhow::Result<()> {
    let config = ExtractConfig {
        before: args.before,
        after: args.after,
    };
    let policy = policy(args.skip_malformed);

    let written = if args.labeled {
        let matched = read_matched_segments(&args.segments_file, policy)
            .with_context(|| format!("reading {}", args.segments_file.display()))?;
        extract_matched_segments(&args.input, &args.output_dir, &matched, &config).await?
    } else {
        let segments = read_segments(&args.segments_file, policy)
            .with_context(|| format!("reading {}", args.segments_file.display()))?;
        extract_segments(&args.input, &args.output_dir, &segments, "segment", &config).await?
    };

    info!(
        files = written.len(),
        output_dir = %args.output_dir.display(),
        "Extraction complete"
    );
    Ok(())
}

/// `annot detect-silence`: silencedetect → silence-segments table.
pub async fn detect_silence_cmd(args: DetectSilenceArgs) -> anyhow::Result<()> {
    let config = SilenceConfig {
        noise_db: args.noise_db,
        min_silence: args.min_silence,
    };

    let silences = detect_silence(&args.input, &config)
        .await
        .with_context(|| format!("analyzing {}", args.input.display()))?;

    write_segments(&args.output_file, &silences)
        .with_context(|| format!("writing {}", args.output_file.display()))?;

    info!(
        input = %args.input.display(),
        silences = silences.len(),
        output = %args.output_file.display(),
        "Silence segments saved"
    );
    Ok(())
}
