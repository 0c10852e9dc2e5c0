//! Glyph tables for the effects.

/// Glyphs used by the rain columns: binary digits then the katakana run.
pub const RAIN_GLYPHS: &[char] = &[
    '0', '1', 'ア', 'イ', 'ウ', 'エ', 'オ', 'カ', 'キ', 'ク', 'ケ', 'コ', 'サ', 'シ', 'ス', 'セ',
    'ソ', 'タ', 'チ', 'ツ', 'テ', 'ト', 'ナ', 'ニ', 'ヌ', 'ネ', 'ノ', 'ハ', 'ヒ', 'フ', 'ヘ', 'ホ',
    'マ', 'ミ', 'ム', 'メ', 'モ', 'ヤ', 'ユ', 'ヨ', 'ラ', 'リ', 'ル', 'レ', 'ロ', 'ワ', 'ヲ', 'ン',
];

/// Particle glyphs by increasing radius.
pub const DOT_GLYPHS: &[char] = &['·', '•', '●'];

/// Glyph for the glow halo around a particle.
pub const GLOW_GLYPH: char = '·';
