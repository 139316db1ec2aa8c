//! Emoji shortcode table, GitHub-common subset. Unknown codes are left as
//! literal text by the inline pass.

/// Shortcode → replacement pairs, sorted by shortcode for binary search.
const EMOJI: &[(&str, &str)] = &[
    ("+1", "\u{1F44D}"),
    ("-1", "\u{1F44E}"),
    ("100", "\u{1F4AF}"),
    ("angry", "\u{1F620}"),
    ("art", "\u{1F3A8}"),
    ("blush", "\u{1F60A}"),
    ("bomb", "\u{1F4A3}"),
    ("book", "\u{1F4D6}"),
    ("boom", "\u{1F4A5}"),
    ("bug", "\u{1F41B}"),
    ("bulb", "\u{1F4A1}"),
    ("clap", "\u{1F44F}"),
    ("cloud", "\u{2601}\u{FE0F}"),
    ("confused", "\u{1F615}"),
    ("construction", "\u{1F6A7}"),
    ("cry", "\u{1F622}"),
    ("eyes", "\u{1F440}"),
    ("fire", "\u{1F525}"),
    ("fireworks", "\u{1F386}"),
    ("frowning", "\u{1F626}"),
    ("gift", "\u{1F381}"),
    ("grin", "\u{1F601}"),
    ("heart", "\u{2764}\u{FE0F}"),
    ("heavy_check_mark", "\u{2714}\u{FE0F}"),
    ("heavy_multiplication_x", "\u{2716}\u{FE0F}"),
    ("hourglass", "\u{231B}"),
    ("joy", "\u{1F602}"),
    ("key", "\u{1F511}"),
    ("laughing", "\u{1F606}"),
    ("lock", "\u{1F512}"),
    ("memo", "\u{1F4DD}"),
    ("metal", "\u{1F918}"),
    ("moneybag", "\u{1F4B0}"),
    ("muscle", "\u{1F4AA}"),
    ("neutral_face", "\u{1F610}"),
    ("ok_hand", "\u{1F44C}"),
    ("package", "\u{1F4E6}"),
    ("pencil2", "\u{270F}\u{FE0F}"),
    ("point_right", "\u{1F449}"),
    ("pray", "\u{1F64F}"),
    ("question", "\u{2753}"),
    ("rage", "\u{1F621}"),
    ("raised_hands", "\u{1F64C}"),
    ("recycle", "\u{267B}\u{FE0F}"),
    ("rocket", "\u{1F680}"),
    ("rotating_light", "\u{1F6A8}"),
    ("see_no_evil", "\u{1F648}"),
    ("shrug", "\u{1F937}"),
    ("smile", "\u{1F604}"),
    ("smiley", "\u{1F603}"),
    ("smirk", "\u{1F60F}"),
    ("sparkles", "\u{2728}"),
    ("star", "\u{2B50}"),
    ("star2", "\u{1F31F}"),
    ("sunglasses", "\u{1F60E}"),
    ("tada", "\u{1F389}"),
    ("thinking", "\u{1F914}"),
    ("thumbsdown", "\u{1F44E}"),
    ("thumbsup", "\u{1F44D}"),
    ("tongue", "\u{1F445}"),
    ("trophy", "\u{1F3C6}"),
    ("warning", "\u{26A0}\u{FE0F}"),
    ("wave", "\u{1F44B}"),
    ("white_check_mark", "\u{2705}"),
    ("wink", "\u{1F609}"),
    ("worried", "\u{1F61F}"),
    ("wrench", "\u{1F527}"),
    ("zap", "\u{26A1}"),
];

/// Look up a shortcode (without the surrounding colons).
pub fn lookup(name: &str) -> Option<&'static str> {
    EMOJI
        .binary_search_by_key(&name, |(code, _)| *code)
        .ok()
        .map(|idx| EMOJI[idx].1)
}
