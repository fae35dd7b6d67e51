// Drives the public API the way the front-end does: build a session, load
// the guitar through an offline output, schedule and check the timeline.

use std::io::Cursor;

use chordpad::audio::{EngineSettings, GuitarEngine, Mixer, OfflineDevice, StereoFrame};
use chordpad::audio_api::AudioCommand;
use chordpad::error::EngineError;
use chordpad::loader::{DirSource, MemorySource, GUITAR_SAMPLES};
use chordpad::music::PhrasePreset;
use chordpad::pipeline::{Scheduler, Session, TimeSignature};

fn sine_wav(midi: i32) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 22050,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let freq = 440.0 * ((midi - 69) as f32 / 12.0).exp2();
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        for i in 0..22050 {
            let t = i as f32 / 22050.0;
            let s = (t * freq * std::f32::consts::TAU).sin() * 8000.0;
            writer.write_sample(s as i16).unwrap();
        }
        writer.finalize().unwrap();
    }
    cursor.into_inner()
}

fn guitar() -> MemorySource {
    GUITAR_SAMPLES
        .iter()
        .fold(MemorySource::new(), |src, def| src.with(def.location, sine_wav(def.midi)))
}

#[test]
fn sketch_a_song_and_play_it() {
    let mut session = Session::default();
    session.set_bpm(120);
    let palette = session.palette();

    let verse = session.create_phrase("Verse").unwrap();
    for degree in [0, 5, 3, 4] {
        session.add_chord(verse, &palette[degree], None).unwrap();
    }
    let chorus = session.create_phrase("Chorus").unwrap();
    session.add_chord(chorus, &palette[3], None).unwrap();
    session.set_preset(chorus, PhrasePreset::PulseRoot).unwrap();

    session.append_to_arrangement(verse).unwrap();
    session.append_to_arrangement(chorus).unwrap();
    session.append_to_arrangement(verse).unwrap();

    let device = OfflineDevice::new(48000);
    let handle = device.handle();
    let mut engine = GuitarEngine::new(device, guitar(), EngineSettings::default());

    let scheduler = Scheduler::default();
    let bpm = session.track().bpm() as f64;
    let slots = session.slot_count();

    let items = session.arrangement().items();
    // nothing is loaded yet, so nothing gets scheduled
    let end = scheduler.play_arrangement(&engine, session.phrases(), items, bpm, slots);
    assert!((end - 24.0).abs() < 1e-9);
    assert!(handle.scheduled().is_empty());

    engine.load().unwrap();
    handle.advance(1.0);
    let end = scheduler.play_arrangement(&engine, session.phrases(), items, bpm, slots);
    assert!((end - 24.0).abs() < 1e-9);

    let notes = handle.scheduled();
    // verse 4 strums of 3, chorus 1 chord pulsed twice, verse again
    assert_eq!(notes.len(), 12 + 2 + 12);
    assert!(notes.windows(2).all(|w| w[0].start <= w[1].start));
    assert!((notes[0].start - 1.02).abs() < 1e-9);
    assert!((notes[12].start - 9.02).abs() < 1e-9);
    assert!((notes[13].start - 10.02).abs() < 1e-9);
    assert!((notes[14].start - 17.02).abs() < 1e-9);
    for n in &notes {
        assert!((n.rate - ((n.pitch - n.source_pitch) as f64 / 12.0).exp2()).abs() < 1e-12);
        assert!((n.pitch - n.source_pitch).abs() <= 6);
    }
}

#[test]
fn one_bar_of_block_chords_at_120_bpm() {
    let mut session = Session::default();
    session.set_bpm(120);
    let palette = session.palette();
    let id = session.create_phrase("Loop").unwrap();
    // C, Am, F, G
    for degree in [0, 5, 3, 4] {
        session.add_chord(id, &palette[degree], None).unwrap();
    }
    session.set_preset(id, PhrasePreset::SustainPad).unwrap();

    let device = OfflineDevice::new(48000);
    let handle = device.handle();
    let mut engine = GuitarEngine::new(device, guitar(), EngineSettings::default());
    engine.load().unwrap();

    let scheduler = Scheduler::default();
    let slot = scheduler.slot_duration(120.0);
    assert!((slot - 2.0).abs() < 1e-12);

    let phrase = session.phrase(id).unwrap();
    let end = scheduler.play_phrase(&engine, phrase, 120.0, session.slot_count(), 0.0);
    assert!((end - 8.0).abs() < 1e-9);

    let notes = handle.scheduled();
    assert_eq!(notes.len(), 12);
    let groups: Vec<(f64, Vec<i32>)> = notes
        .chunks(3)
        .map(|g| (g[0].start, g.iter().map(|n| n.pitch).collect()))
        .collect();
    assert_eq!(groups[0].1, vec![48, 52, 55]);
    assert_eq!(groups[1].1, vec![57, 60, 64]);
    assert_eq!(groups[2].1, vec![53, 57, 60]);
    assert_eq!(groups[3].1, vec![55, 59, 62]);
    for (i, chunk) in notes.chunks(3).enumerate() {
        let want = 0.02 + i as f64 * slot;
        assert!(chunk.iter().all(|n| (n.start - want).abs() < 1e-9), "group {i}");
    }
    assert!((groups[3].0 - 6.02).abs() < 1e-9);
}

#[test]
fn time_signature_changes_reshape_playback() {
    let mut session = Session::default();
    let palette = session.palette();
    let id = session.create_phrase("Waltz").unwrap();
    for degree in 0..6 {
        session.add_chord(id, &palette[degree], None).unwrap();
    }
    session.set_time_signature(TimeSignature::ThreeThree);
    let phrase = session.phrase(id).unwrap();
    assert_eq!(phrase.bar_count(), 2);
    assert!(phrase.bars().iter().all(|bar| bar.len() == 3));

    let scheduler = Scheduler::default();
    // 90 bpm: 4 beats per slot = 8/3 s, 2 bars of 3 slots
    let d = scheduler.phrase_duration(phrase, 90.0, session.slot_count());
    assert!((d - 16.0).abs() < 1e-9);
}

#[test]
fn missing_sample_directory_fails_cleanly_and_retries() {
    let dir = tempfile::tempdir().unwrap();
    let device = OfflineDevice::new(44100);
    let source = DirSource::new(dir.path());
    let mut engine = GuitarEngine::new(device, source, EngineSettings::default());

    assert!(matches!(engine.load(), Err(EngineError::Fetch { .. })));
    assert!(!engine.is_loaded());

    for def in GUITAR_SAMPLES {
        std::fs::write(dir.path().join(def.location), sine_wav(def.midi)).unwrap();
    }
    engine.load().unwrap();
    assert!(engine.is_loaded());
}

#[test]
fn scheduled_chord_renders_through_the_mixer() {
    let device = OfflineDevice::new(44100);
    let handle = device.handle();
    let mut engine = GuitarEngine::new(device, guitar(), EngineSettings::default());
    let chord = Session::default().palette()[0].clone();
    engine.play_chord(&chord, 0.1, Some(0.2)).unwrap();

    let clock = std::sync::Arc::new(std::sync::atomic::AtomicU64::new(0));
    let mut mixer = Mixer::new(44100, clock);
    for trigger in handle.take_scheduled() {
        mixer.handle_cmd(AudioCommand::Play(trigger));
    }

    // 0.5 s in blocks of 512 frames
    let mut out = Vec::new();
    let mut block = vec![StereoFrame::zero(); 512];
    while out.len() < 22050 {
        mixer.render_block(&mut block);
        out.extend_from_slice(&block);
    }

    let loud = |range: std::ops::Range<usize>| out[range].iter().any(|f| f.left.abs() > 1e-4);
    // silent before 0.12 s, sounding until 0.32 s, silent after
    assert!(!loud(0..5200));
    assert!(loud(5400..14000));
    assert!(!loud(14200..22050));
    assert_eq!(mixer.active_voices(), 0);
}
