use crate::calc::CalcError;
use rand::Rng;
use serde::Serialize;

const CRIT_SUCCESS_THRESHOLD: i64 = 95;
const CRIT_FAILURE_THRESHOLD: i64 = 5;

// カード名→基礎値。絵札はマイナス
const CARD_VALUES: [(&str, f64); 13] = [
    ("Ace", 10.0),
    ("2", 2.0),
    ("3", 3.0),
    ("4", 4.0),
    ("5", 5.0),
    ("6", 6.0),
    ("7", 7.0),
    ("8", 8.0),
    ("9", 9.0),
    ("10", 10.0),
    ("Jack", -5.0),
    ("Queen", -8.0),
    ("King", -10.0),
];

const HOSTILE: [&str; 4] = [
    "The cards turn against you. Fate is not merely unkind, it is hostile.",
    "Dark energies coil around the spread. The Faire offers no mercy.",
    "The deck recoils. Whatever you attempt, expect resistance.",
    "You were not simply unlucky. You were actively opposed.",
];

const POOR: [&str; 4] = [
    "The cards waver uneasily. Fortune does not favor you today.",
    "The spread is weak, uncertain, and unreliable.",
    "Luck is thin here. Proceed, but expect setbacks.",
    "The Darkmoon cards whisper doubt and hesitation.",
];

const FAVORABLE: [&str; 4] = [
    "The cards align, though imperfectly. Fortune leans your way.",
    "A modest but usable fate reveals itself.",
    "The spread shows promise, if not certainty.",
    "Luck is present, but it demands effort.",
];

const STRONG: [&str; 4] = [
    "The cards glow faintly. Fortune is firmly on your side.",
    "A strong alignment forms across the spread.",
    "The cards smile upon this outcome.",
    "Luck gathers, steady and reliable.",
];

const OVERWHELMING: [&str; 4] = [
    "The cards blaze with power. Fate bends willingly.",
    "This is no coincidence. Fortune has chosen you.",
    "Overwhelming fortune surges through the spread.",
    "The deck sings. Victory is inevitable.",
];

const CRIT_SUCCESS: [&str; 3] = [
    "A perfect draw! The deck smiles upon you in full glory.",
    "Fate itself bends to your will.",
    "The cards blaze with overwhelming power. Victory is assured!",
];

const CRIT_FAILURE: [&str; 3] = [
    "A catastrophic spread! The cards conspire against you.",
    "Critical failure! Nothing goes your way.",
    "The deck frowns. Misfortune overwhelms all attempts.",
];

/// デッキ固有のオーバーレイ文（クリティカル時は付与しない）
fn deck_flavor(deck: &str) -> Option<&'static [&'static str; 3]> {
    match deck {
        "Furies" => Some(&[
            "Relentless wrath courses through the spread.",
            "The cards burn with barely restrained fury.",
            "Anger and retribution press heavily upon fate.",
        ]),
        "Nightmares" => Some(&[
            "Distorted visions coil through the cards.",
            "The spread reeks of dread and broken dreams.",
            "Unsettling omens seep from every draw.",
        ]),
        "Deception" => Some(&[
            "Illusions twist the truth beyond recognition.",
            "The cards conceal as much as they reveal.",
            "Nothing in this spread is as it appears.",
        ]),
        "Vengeance" => Some(&[
            "Old debts demand to be answered.",
            "The deck remembers every slight.",
            "Retribution waits patiently within the cards.",
        ]),
        "Commendation" => Some(&[
            "Recognition glimmers faintly within the spread.",
            "The cards acknowledge effort, if not triumph.",
            "Merit is noted, though rewards remain uncertain.",
        ]),
        "Resurrection" => Some(&[
            "Faded fortunes stir back toward life.",
            "What was lost may yet return altered.",
            "The deck hums with renewed possibility.",
        ]),
        "War" => Some(&[
            "The spread echoes with the din of battle.",
            "Victory and loss hang in fragile balance.",
            "The deck rumbles...",
        ]),
        "Tragedy" => Some(&[
            "Sorrow weighs heavily upon the cards.",
            "The spread speaks of loss long endured.",
            "Fate turns cruel and unyielding.",
        ]),
        "Madness" => Some(&[
            "Reason fractures beneath chaotic forces.",
            "The cards refuse orderly interpretation.",
            "Unstable energies warp the spread.",
        ]),
        "Hopes" => Some(&[
            "A fragile optimism lingers within the cards.",
            "Possibility flickers, uncertain but present.",
            "The spread suggests promise not yet realized.",
        ]),
        "Fables" => Some(&[
            "Ancient stories whisper through the draw.",
            "Lessons of old shape the present fate.",
            "Myth and meaning entwine within the cards.",
        ]),
        "Dominion" => Some(&[
            "Authority asserts itself across the spread.",
            "Power gathers, demanding command.",
            "The cards favor control and resolve.",
        ]),
        "Judgment" => Some(&[
            "Actions are weighed with impartial clarity.",
            "The cards offer no mercy, only truth.",
            "Consequences reveal themselves without bias.",
        ]),
        _ => None,
    }
}

fn required_score(difficulty: &str) -> Option<f64> {
    match difficulty {
        "trivial" => Some(20.0),
        "normal" => Some(40.0),
        "epic" => Some(70.0),
        "legendary" => Some(100.0),
        _ => None,
    }
}

fn pick<const N: usize>(rng: &mut impl Rng, texts: &[&'static str; N]) -> String {
    texts[rng.random_range(0..N)].to_string()
}

fn draw_cards(n: usize, rng: &mut impl Rng) -> Vec<(&'static str, f64)> {
    (0..n)
        .map(|_| CARD_VALUES[rng.random_range(0..CARD_VALUES.len())])
        .collect()
}

/// デッキごとの補正式をドロー値に適用する
fn apply_deck(draws: &[(&str, f64)], deck: &str, rng: &mut impl Rng) -> Result<f64, CalcError> {
    let values: Vec<f64> = draws.iter().map(|(_, v)| *v).collect();
    let sum: f64 = values.iter().sum();

    let score = match deck {
        "Judgment" => sum,
        "Commendation" => sum * 1.1,
        "Hopes" => sum + 5.0,
        "Furies" => values
            .iter()
            .map(|&v| if v > 0.0 { v * 1.3 } else { v * 0.8 })
            .sum(),
        "Vengeance" => values
            .iter()
            .map(|&v| if v > 0.0 { v * 1.4 } else { v * 1.2 })
            .sum(),
        "War" => values
            .iter()
            .map(|&v| v * rng.random_range(0.5..1.8))
            .sum(),
        "Nightmares" => values
            .iter()
            .map(|&v| v * rng.random_range(0.5..1.1))
            .sum(),
        "Tragedy" => values
            .iter()
            .map(|&v| if v > 0.0 { v * 0.7 } else { v * 1.5 })
            .sum(),
        "Resurrection" => values
            .iter()
            .map(|&v| if v > 0.0 { v } else { v * 0.3 })
            .sum(),
        "Deception" => {
            let avg = sum / values.len() as f64;
            avg * values.len() as f64
        }
        "Madness" => values
            .iter()
            .map(|&v| v * rng.random_range(0.3..2.0))
            .sum(),
        "Fables" => values
            .iter()
            .map(|&v| v * rng.random_range(0.9..1.3))
            .sum(),
        "Dominion" => {
            if sum > 0.0 {
                sum * 1.5
            } else {
                sum * 1.3
            }
        }
        _ => return Err(CalcError::UnknownDeck(deck.to_string())),
    };

    Ok(score)
}

/// 成功率に応じたフレーバー文。クリティカルは全てを上書きする
fn flavor_from_chance(chance: i64, deck: &str, rng: &mut impl Rng) -> String {
    if chance >= CRIT_SUCCESS_THRESHOLD {
        return pick(rng, &CRIT_SUCCESS);
    }
    if chance <= CRIT_FAILURE_THRESHOLD {
        return pick(rng, &CRIT_FAILURE);
    }

    let base = if chance < 25 {
        pick(rng, &HOSTILE)
    } else if chance < 50 {
        pick(rng, &POOR)
    } else if chance < 75 {
        pick(rng, &FAVORABLE)
    } else if chance < 95 {
        pick(rng, &STRONG)
    } else {
        pick(rng, &OVERWHELMING)
    };

    match deck_flavor(deck) {
        Some(overlay) => format!("{} {}", base, pick(rng, overlay)),
        None => base,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DarkmoonReading {
    pub score: i64,
    pub chance: i64,
    pub cards: Vec<String>,
    pub deck: String,
    pub difficulty: String,
    pub comment: String,
}

/// カードを引き、デッキ補正と難易度から成功率を占う
pub fn luck_reading(
    num_cards: usize,
    deck: &str,
    difficulty: &str,
) -> Result<DarkmoonReading, CalcError> {
    if num_cards == 0 {
        return Err(CalcError::NoCards);
    }
    let required = required_score(difficulty)
        .ok_or_else(|| CalcError::UnknownDifficulty(difficulty.to_string()))?;

    let rng = &mut rand::rng();
    let draws = draw_cards(num_cards, rng);
    let score = apply_deck(&draws, deck, rng)?;
    let chance = ((score / required) * 100.0) as i64;
    let chance = chance.clamp(0, 100);

    // 難易度表記は先頭だけ大文字に
    let mut difficulty_label = difficulty.to_string();
    if let Some(first) = difficulty_label.get_mut(0..1) {
        first.make_ascii_uppercase();
    }

    Ok(DarkmoonReading {
        score: score as i64,
        chance,
        cards: draws.iter().map(|(card, _)| card.to_string()).collect(),
        deck: deck.to_string(),
        difficulty: difficulty_label,
        comment: flavor_from_chance(chance, deck, rng),
    })
}
