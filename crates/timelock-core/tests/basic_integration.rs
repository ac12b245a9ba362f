use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rug::Integer;
use timelock_core::engine::{self, CancellationToken};
use timelock_core::{PuzzleCodec, PuzzleConfig, TimelockPuzzle};

#[test]
fn test_basic_functionality() {
    // Engine
    let token = CancellationToken::new();
    let y = engine::sequential_squarings(&Integer::from(2), 3, &Integer::from(257), &token);
    assert_eq!(y.unwrap(), Integer::from(256)); // 2^8 mod 257

    // Codec
    let codec = PuzzleCodec::new(PuzzleConfig::default()).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let puzzle = codec.encrypt(b"basic", 8, &mut rng).unwrap();
    assert_eq!(puzzle.iterations(), 8);

    // Wire
    let json = puzzle.to_json().unwrap();
    let parsed = TimelockPuzzle::from_json(&json).unwrap();
    assert_eq!(parsed, puzzle);

    assert_eq!(timelock_core::decrypt(&parsed).unwrap(), b"basic");
}
