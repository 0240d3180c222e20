//! Integration tests driving the whole pipeline with synthesized tones.

use lazy_static::lazy_static;
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use std::f32::consts::PI;
use tonal_analyzer::{Analyzer, ChordQuality, Mode, NoteName};

const FRAME_SIZE: usize = 2_048;
const SAMPLE_RATE: u32 = 44_100;

/// One frame of a sine with an exact integer period in samples.
///
/// Integer periods keep the autocorrelation peak on the true lag, so the
/// detected frequency is exactly `sample_rate / period`.
fn periodic_frame(period: usize, amplitude: f32) -> Vec<f32> {
    (0..FRAME_SIZE)
        .map(|i| amplitude * (2.0 * PI * i as f32 / period as f32).sin())
        .collect()
}

/// Sample periods for tones of the wanted pitch classes at 44.1 kHz.
/// 168 -> 262.5 Hz (C4), 150 -> 294 Hz (D4), 136 -> 324.3 Hz (E4),
/// 126 -> 350 Hz (F4), 224 -> 196.9 Hz (G3), 200 -> 220.5 Hz (A3),
/// 90 -> 490 Hz (B4), 120 -> 367.5 Hz (F#4).
const C_PERIOD: usize = 168;
const D_PERIOD: usize = 150;
const E_PERIOD: usize = 136;
const F_PERIOD: usize = 126;
const G_PERIOD: usize = 224;
const A_PERIOD: usize = 200;
const B_PERIOD: usize = 90;
const FS_PERIOD: usize = 120;

/// A 120-sample period analyzed at different sample rates lands on
/// different notes; the frame content is identical for every case.
struct ToneCase {
    sample_rate: u32,
    expected_name: NoteName,
    expected_octave: i32,
}

lazy_static! {
    static ref TONE_CASES: Vec<ToneCase> = vec![
        ToneCase { sample_rate: 22_050, expected_name: NoteName::Fs, expected_octave: 3 },
        ToneCase { sample_rate: 28_000, expected_name: NoteName::As, expected_octave: 3 },
        ToneCase { sample_rate: 32_000, expected_name: NoteName::C, expected_octave: 4 },
        ToneCase { sample_rate: 36_000, expected_name: NoteName::D, expected_octave: 4 },
        ToneCase { sample_rate: 40_000, expected_name: NoteName::E, expected_octave: 4 },
        ToneCase { sample_rate: 44_100, expected_name: NoteName::Fs, expected_octave: 4 },
        ToneCase { sample_rate: 48_000, expected_name: NoteName::G, expected_octave: 4 },
        ToneCase { sample_rate: 50_000, expected_name: NoteName::Gs, expected_octave: 4 },
        ToneCase { sample_rate: 60_000, expected_name: NoteName::B, expected_octave: 4 },
        ToneCase { sample_rate: 64_000, expected_name: NoteName::C, expected_octave: 5 },
        ToneCase { sample_rate: 88_200, expected_name: NoteName::Fs, expected_octave: 5 },
        ToneCase { sample_rate: 96_000, expected_name: NoteName::G, expected_octave: 5 },
    ];
}

#[test]
fn pitch_and_note_across_sample_rates() {
    let frame = periodic_frame(FS_PERIOD, 2.0);

    TONE_CASES.par_iter().for_each(|case| {
        let mut session = Analyzer::builder()
            .frame_size(FRAME_SIZE)
            .sample_rate(case.sample_rate)
            .build()
            .unwrap();

        let snapshot = session.process_frame(&frame).unwrap();
        let expected_hz = case.sample_rate as f32 / FS_PERIOD as f32;

        let pitch = snapshot
            .pitch_hz
            .unwrap_or_else(|| panic!("no pitch at {} Hz sample rate", case.sample_rate));
        assert!(
            (pitch - expected_hz).abs() / expected_hz < 0.01,
            "rate {}: expected ~{expected_hz} Hz, got {pitch} Hz",
            case.sample_rate
        );

        let note = snapshot.note.unwrap();
        assert_eq!(
            (note.name, note.octave),
            (case.expected_name, case.expected_octave),
            "rate {}: wrong note {note}",
            case.sample_rate
        );
    });
}

#[test]
fn scale_drives_key_estimate() {
    let scale = [
        C_PERIOD, D_PERIOD, E_PERIOD, F_PERIOD, G_PERIOD, A_PERIOD, B_PERIOD,
    ];
    let mut session = Analyzer::builder()
        .frame_size(FRAME_SIZE)
        .sample_rate(SAMPLE_RATE)
        .build()
        .unwrap();

    let mut last = None;
    for _ in 0..3 {
        for period in scale {
            last = Some(session.process_frame(&periodic_frame(period, 2.0)).unwrap());
        }
    }

    let key = last.unwrap().key.expect("key estimate");
    assert_eq!(key.tonic, NoteName::C);
    assert_eq!(key.mode, Mode::Major);
    assert_eq!(session.observations(), 21);
}

#[test]
fn arpeggio_drives_chord_guess() {
    let mut session = Analyzer::builder()
        .frame_size(FRAME_SIZE)
        .sample_rate(SAMPLE_RATE)
        .build()
        .unwrap();

    // C - E - G arpeggio; the third frame completes the triad.
    session.process_frame(&periodic_frame(C_PERIOD, 2.0)).unwrap();
    let two_notes = session.process_frame(&periodic_frame(E_PERIOD, 2.0)).unwrap();
    assert_eq!(two_notes.chord, None);

    let triad = session.process_frame(&periodic_frame(G_PERIOD, 2.0)).unwrap();
    let chord = triad.chord.expect("chord guess");
    assert_eq!(chord.root, NoteName::C);
    assert_eq!(chord.quality, ChordQuality::Major);

    // An extra unrelated tone does not break the permissive match.
    let extra = session.process_frame(&periodic_frame(A_PERIOD, 2.0)).unwrap();
    let chord = extra.chord.expect("chord guess");
    assert_eq!(chord.root, NoteName::C);
    assert_eq!(chord.quality, ChordQuality::Major);
}

#[test]
fn minor_arpeggio_guesses_minor() {
    let mut session = Analyzer::builder()
        .frame_size(FRAME_SIZE)
        .sample_rate(SAMPLE_RATE)
        .build()
        .unwrap();

    for period in [A_PERIOD, C_PERIOD, E_PERIOD] {
        session.process_frame(&periodic_frame(period, 2.0)).unwrap();
    }
    let chord = session.latest().chord.expect("chord guess");
    assert_eq!(chord.root, NoteName::A);
    assert_eq!(chord.quality, ChordQuality::Minor);
}

#[test]
fn reset_separates_sessions() {
    let g_major = [
        G_PERIOD, A_PERIOD, B_PERIOD, C_PERIOD, D_PERIOD, E_PERIOD, FS_PERIOD,
    ];
    let c_major = [
        C_PERIOD, D_PERIOD, E_PERIOD, F_PERIOD, G_PERIOD, A_PERIOD, B_PERIOD,
    ];
    let mut session = Analyzer::builder()
        .frame_size(FRAME_SIZE)
        .sample_rate(SAMPLE_RATE)
        .build()
        .unwrap();

    for _ in 0..3 {
        for period in g_major {
            session.process_frame(&periodic_frame(period, 2.0)).unwrap();
        }
    }
    let key = session.latest().key.expect("key estimate");
    assert_eq!((key.tonic, key.mode), (NoteName::G, Mode::Major));

    session.reset();
    assert_eq!(session.observations(), 0);
    assert_eq!(session.latest().key, None);

    for _ in 0..3 {
        for period in c_major {
            session.process_frame(&periodic_frame(period, 2.0)).unwrap();
        }
    }
    let key = session.latest().key.expect("key estimate");
    assert_eq!((key.tonic, key.mode), (NoteName::C, Mode::Major));
}

#[test]
fn silence_produces_no_estimates() {
    let mut session = Analyzer::builder()
        .frame_size(FRAME_SIZE)
        .sample_rate(SAMPLE_RATE)
        .build()
        .unwrap();

    let silence = vec![0.0f32; FRAME_SIZE];
    for _ in 0..4 {
        let snapshot = session.process_frame(&silence).unwrap();
        assert_eq!(snapshot.pitch_hz, None);
        assert_eq!(snapshot.note, None);
        assert_eq!(snapshot.key, None);
        assert_eq!(snapshot.chord, None);
    }
    assert_eq!(session.observations(), 0);
}

#[test]
fn spectrum_shows_energy_for_tones_only() {
    let mut session = Analyzer::builder()
        .frame_size(FRAME_SIZE)
        .sample_rate(SAMPLE_RATE)
        .build()
        .unwrap();

    // A few frames let the display smoothing converge.
    let mut tonal = session.process_frame(&periodic_frame(C_PERIOD, 2.0)).unwrap();
    for _ in 0..3 {
        tonal = session.process_frame(&periodic_frame(C_PERIOD, 2.0)).unwrap();
    }
    assert!(tonal.spectrum.iter().any(|&m| m > 0.5));
    assert!(tonal.spectrum.iter().all(|&m| (0.0..=1.0).contains(&m)));
}
