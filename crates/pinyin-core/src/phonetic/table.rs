use super::Tone;

pub(super) struct ToneMark {
    /// Exact character or combining sequence as it appears in a reading.
    pub marked: &'static str,
    /// ASCII replacement.
    pub base: &'static str,
    /// `None` for letters that carry no tone (ü, ê).
    pub tone: Option<Tone>,
}

const fn mark(marked: &'static str, base: &'static str, tone: Option<Tone>) -> ToneMark {
    ToneMark { marked, base, tone }
}

const T1: Option<Tone> = Some(Tone::First);
const T2: Option<Tone> = Some(Tone::Second);
const T3: Option<Tone> = Some(Tone::Third);
const T4: Option<Tone> = Some(Tone::Fourth);

/// Every diacritic variant the normalizer understands.
///
/// Matching is first-hit in table order, so each multi-codepoint sequence
/// must precede any entry that is a prefix of it.
pub(super) static TONE_MARKS: &[ToneMark] = &[
    // decomposed ü with a tone mark
    mark("u\u{0308}\u{0304}", "v", T1),
    mark("u\u{0308}\u{0301}", "v", T2),
    mark("u\u{0308}\u{030C}", "v", T3),
    mark("u\u{0308}\u{0300}", "v", T4),
    // ü followed by a combining tone mark
    mark("ü\u{0304}", "v", T1),
    mark("ü\u{0301}", "v", T2),
    mark("ü\u{030C}", "v", T3),
    mark("ü\u{0300}", "v", T4),
    // ê with a combining tone mark (only two have a precomposed form)
    mark("ê\u{0304}", "e", T1),
    mark("ê\u{0301}", "e", T2),
    mark("ê\u{030C}", "e", T3),
    mark("ê\u{0300}", "e", T4),
    // fully decomposed ê
    mark("e\u{0302}\u{0304}", "e", T1),
    mark("e\u{0302}\u{0301}", "e", T2),
    mark("e\u{0302}\u{030C}", "e", T3),
    mark("e\u{0302}\u{0300}", "e", T4),
    mark("e\u{0302}", "e", None),
    // decomposed ü
    mark("u\u{0308}", "v", None),
    // decomposed a
    mark("a\u{0304}", "a", T1),
    mark("a\u{0301}", "a", T2),
    mark("a\u{030C}", "a", T3),
    mark("a\u{0300}", "a", T4),
    // decomposed e
    mark("e\u{0304}", "e", T1),
    mark("e\u{0301}", "e", T2),
    mark("e\u{030C}", "e", T3),
    mark("e\u{0300}", "e", T4),
    // decomposed i
    mark("i\u{0304}", "i", T1),
    mark("i\u{0301}", "i", T2),
    mark("i\u{030C}", "i", T3),
    mark("i\u{0300}", "i", T4),
    // decomposed o
    mark("o\u{0304}", "o", T1),
    mark("o\u{0301}", "o", T2),
    mark("o\u{030C}", "o", T3),
    mark("o\u{0300}", "o", T4),
    // decomposed u
    mark("u\u{0304}", "u", T1),
    mark("u\u{0301}", "u", T2),
    mark("u\u{030C}", "u", T3),
    mark("u\u{0300}", "u", T4),
    // decomposed syllabic m
    mark("m\u{0304}", "m", T1),
    mark("m\u{0301}", "m", T2),
    mark("m\u{030C}", "m", T3),
    mark("m\u{0300}", "m", T4),
    // decomposed syllabic n
    mark("n\u{0304}", "n", T1),
    mark("n\u{0301}", "n", T2),
    mark("n\u{030C}", "n", T3),
    mark("n\u{0300}", "n", T4),
    // a
    mark("ā", "a", T1),
    mark("á", "a", T2),
    mark("ǎ", "a", T3),
    mark("à", "a", T4),
    // e
    mark("ē", "e", T1),
    mark("é", "e", T2),
    mark("ě", "e", T3),
    mark("è", "e", T4),
    mark("ế", "e", T2),
    mark("ề", "e", T4),
    mark("ê", "e", None),
    // i
    mark("ī", "i", T1),
    mark("í", "i", T2),
    mark("ǐ", "i", T3),
    mark("ì", "i", T4),
    // o
    mark("ō", "o", T1),
    mark("ó", "o", T2),
    mark("ǒ", "o", T3),
    mark("ò", "o", T4),
    // u
    mark("ū", "u", T1),
    mark("ú", "u", T2),
    mark("ǔ", "u", T3),
    mark("ù", "u", T4),
    // ü
    mark("ǖ", "v", T1),
    mark("ǘ", "v", T2),
    mark("ǚ", "v", T3),
    mark("ǜ", "v", T4),
    mark("ü", "v", None),
    // syllabic n and m
    mark("ń", "n", T2),
    mark("ň", "n", T3),
    mark("ǹ", "n", T4),
    mark("ḿ", "m", T2),
];
