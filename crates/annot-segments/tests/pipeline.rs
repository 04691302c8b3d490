//! End-to-end pipeline tests over real CSV tables:
//! scored frames → filter → merge → good segments → attribution → matched
//! segments.

use std::fs;

use annot_models::Interval;
use annot_segments::{
    filter_frames, match_speakers, merge_intervals, read_scored_frames, read_segments, read_turns,
    write_matched_segments, write_segments, FilterConfig, FilterMode, MalformedPolicy, MergeConfig,
};
use tempfile::TempDir;

const FRAMES_CSV: &str = "\
start_time_s,end_time_s,music_prob,speech_prob
0.0,1.0,0.05,0.95
1.0,2.0,0.05,0.92
2.2,3.2,0.1,0.9
3.2,4.2,0.95,0.05
4.2,5.2,0.9,0.1
8.0,9.0,0.05,0.99
";

const TURNS_CSV: &str = "\
start,stop,speaker
0.0,1.5,SPEAKER_00
1.5,3.5,SPEAKER_01
7.5,9.5,SPEAKER_00
";

fn run_pipeline(dir: &TempDir) -> (std::path::PathBuf, std::path::PathBuf) {
    let frames_path = dir.path().join("frames.csv");
    let turns_path = dir.path().join("turns.csv");
    let segments_path = dir.path().join("good_segments.csv");
    let matched_path = dir.path().join("matched.csv");

    fs::write(&frames_path, FRAMES_CSV).unwrap();
    fs::write(&turns_path, TURNS_CSV).unwrap();

    let frames = read_scored_frames(&frames_path, MalformedPolicy::Fail).unwrap();
    let raw = filter_frames(&frames, FilterMode::Speech, &FilterConfig::default()).unwrap();
    let merged = merge_intervals(&raw, &MergeConfig::default().with_max_gap(0.4)).unwrap();
    write_segments(&segments_path, &merged).unwrap();

    let good = read_segments(&segments_path, MalformedPolicy::Fail).unwrap();
    let turns = read_turns(&turns_path, MalformedPolicy::Fail).unwrap();
    let matched = match_speakers(&good, &turns).unwrap();
    write_matched_segments(&matched_path, &matched).unwrap();

    (segments_path, matched_path)
}

#[test]
fn test_full_pipeline() {
    let dir = TempDir::new().unwrap();
    let (segments_path, matched_path) = run_pipeline(&dir);

    // Speech frames 0-2 and 2.2-3.2 merge across the 0.2s gap; the music
    // frames drop out; the isolated 8-9 frame stays separate
    let good = read_segments(&segments_path, MalformedPolicy::Fail).unwrap();
    assert_eq!(good.len(), 2);
    assert_eq!(good[0].start(), 0.0);
    assert_eq!(good[0].end(), 3.2);
    assert_eq!(good[1].start(), 8.0);
    assert_eq!(good[1].end(), 9.0);

    // Attribution clips against the three turns
    let matched = fs::read_to_string(&matched_path).unwrap();
    let lines: Vec<&str> = matched.lines().collect();
    assert_eq!(lines[0], "start_time,end_time,speaker");
    assert_eq!(lines.len(), 4);
    assert!(lines[1].contains("SPEAKER_00"));
    assert!(lines[2].contains("SPEAKER_01"));
    assert!(lines[3].contains("SPEAKER_00"));
}

#[test]
fn test_pipeline_is_byte_deterministic() {
    let dir_a = TempDir::new().unwrap();
    let dir_b = TempDir::new().unwrap();

    let (seg_a, matched_a) = run_pipeline(&dir_a);
    let (seg_b, matched_b) = run_pipeline(&dir_b);

    assert_eq!(fs::read(&seg_a).unwrap(), fs::read(&seg_b).unwrap());
    assert_eq!(fs::read(&matched_a).unwrap(), fs::read(&matched_b).unwrap());
}

#[test]
fn test_empty_frames_produce_empty_tables() {
    let dir = TempDir::new().unwrap();
    let frames_path = dir.path().join("frames.csv");
    let out_path = dir.path().join("out.csv");

    fs::write(
        &frames_path,
        "start_time_s,end_time_s,music_prob,speech_prob\n",
    )
    .unwrap();

    let frames = read_scored_frames(&frames_path, MalformedPolicy::Fail).unwrap();
    assert!(frames.is_empty());

    let raw = filter_frames(&frames, FilterMode::Music, &FilterConfig::default()).unwrap();
    let merged = merge_intervals(&raw, &MergeConfig::default()).unwrap();
    assert!(merged.is_empty());

    write_segments(&out_path, &merged).unwrap();
    assert_eq!(
        fs::read_to_string(&out_path).unwrap(),
        "start_time,end_time\n"
    );
}

#[test]
fn test_malformed_input_aborts_before_output() {
    let dir = TempDir::new().unwrap();
    let frames_path = dir.path().join("frames.csv");
    let out_path = dir.path().join("out.csv");

    fs::write(
        &frames_path,
        "start_time_s,end_time_s,music_prob,speech_prob\n0.0,1.0,0.5,bad\n",
    )
    .unwrap();

    let result = read_scored_frames(&frames_path, MalformedPolicy::Fail);
    assert!(result.is_err());
    // The read failed before anything was written
    assert!(!out_path.exists());
}

#[test]
fn test_failed_write_leaves_no_output_file() {
    let dir = TempDir::new().unwrap();
    // Parent directory does not exist, so the staging file cannot be created
    let out_path = dir.path().join("missing").join("out.csv");

    let segments = vec![Interval::new(0.0, 1.0).unwrap()];
    let result = write_segments(&out_path, &segments);

    assert!(result.is_err());
    assert!(!out_path.exists());
}
