//! Argument definitions for the `annot` binary.

use std::path::PathBuf;

use annot_segments::filter::FilterMode;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "annot",
    about = "Offline audio annotation: classify, merge, attribute and extract time segments",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Filter scored frames and merge them into good segments
    Filter(FilterArgs),
    /// Attribute speakers to good segments using diarization turns
    MatchSpeakers(MatchSpeakersArgs),
    /// Extract segments from the recording as audio files
    Extract(ExtractArgs),
    /// Detect silence regions and write them as a segments table
    DetectSilence(DetectSilenceArgs),
}

#[derive(Args, Debug)]
pub struct FilterArgs {
    /// Scored-frames CSV (start_time_s, end_time_s, music_prob, speech_prob)
    pub input_file: PathBuf,

    /// Output segments CSV (start_time, end_time)
    pub output_file: PathBuf,

    /// Classification mode: music or speech
    #[arg(long, value_name = "MODE")]
    pub filter_type: FilterMode,

    /// Music probability lower bound (music mode; default 0.4)
    #[arg(long)]
    pub music_min_threshold: Option<f64>,

    /// Music probability upper bound (speech mode; default 0.2)
    #[arg(long)]
    pub music_max_threshold: Option<f64>,

    /// Speech probability lower bound (speech mode; default 0.8)
    #[arg(long)]
    pub speech_min_threshold: Option<f64>,

    /// Speech probability upper bound (music mode; default 0.9)
    #[arg(long)]
    pub speech_max_threshold: Option<f64>,

    /// Maximum gap in seconds between segments to merge across
    #[arg(long, default_value_t = annot_segments::DEFAULT_MAX_GAP)]
    pub max_gap: f64,

    /// Drop merged segments shorter than this many seconds
    #[arg(long, default_value_t = 0.0)]
    pub min_duration: f64,

    /// Skip malformed rows instead of aborting
    #[arg(long)]
    pub skip_malformed: bool,
}

#[derive(Args, Debug)]
pub struct MatchSpeakersArgs {
    /// Good-segments CSV (start_time, end_time)
    pub good_segments_file: PathBuf,

    /// Diarization CSV (start, stop, speaker)
    pub diarization_file: PathBuf,

    /// Output matched-segments CSV (start_time, end_time, speaker)
    pub output_file: PathBuf,

    /// Skip malformed rows instead of aborting
    #[arg(long)]
    pub skip_malformed: bool,
}

#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Source audio file
    pub input: PathBuf,

    /// Segments CSV to extract; plain or speaker-matched (see --labeled)
    pub segments_file: PathBuf,

    /// Directory for the extracted wav files
    pub output_dir: PathBuf,

    /// Margin in seconds to include before each segment
    #[arg(long, default_value_t = 0.0)]
    pub before: f64,

    /// Margin in seconds to include after each segment
    #[arg(long, default_value_t = 0.0)]
    pub after: f64,

    /// Treat the segments file as a matched table and label files by speaker
    #[arg(long)]
    pub labeled: bool,

    /// Skip malformed rows instead of aborting
    #[arg(long)]
    pub skip_malformed: bool,
}

#[derive(Args, Debug)]
pub struct DetectSilenceArgs {
    /// Source audio file
    pub input: PathBuf,

    /// Output silence-segments CSV (start_time, end_time)
    pub output_file: PathBuf,

    /// Noise floor in dBFS below which audio counts as silence
    #[arg(long, default_value_t = -40.0, allow_hyphen_values = true)]
    pub noise_db: f64,

    /// Minimum silence duration in seconds to report
    #[arg(long, default_value_t = 0.5)]
    pub min_silence: f64,
}
