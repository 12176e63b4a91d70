//! Fixed texts, menus and word lists the bot replies with

use crate::domain::entities::{Action, MenuOption, UserStats};

/// Trivia about Atbash and old Hebrew codes
pub const FUN_FACTS: [&str; 5] = [
    "שפת אתבש הייתה אחת משיטות ההצפנה הראשונות בהיסטוריה!",
    "בספר ירמיהו בתנ״ך, המילה 'ששך' היא למעשה 'בבל' בצופן אתבש",
    "הגימטריה היא שיטת קידוד עתיקה נוספת בעברית",
    "צופן אתבש הוא דוגמה לצופן החלפה חד-אלפביתי",
    "בימי בית המקדש השתמשו בצפנים שונים להעברת מסרים",
];

/// Candidate secret words for the guessing game
pub const GAME_WORDS: [&str; 5] = ["שלום", "תודה", "אהבה", "שמחה", "חיים"];

pub const WELCOME: &str = "ברוך הבא לבוט האתבש המתקדם! 🎉\nבחר אחת מהאפשרויות הבאות:";

pub const HELP: &str = "שלח לי טקסט ואמיר אותו לצופן אתבש.\nאפשר גם לבחור אחת מהאפשרויות הבאות:";

pub const EXPLAIN: &str = "🔍 איך עובד צופן אתבש?\n\
כל אות מוחלפת באות המקבילה לה מסוף האלפבית:\n\
א ⟷ ת\n\
ב ⟷ ש\n\
ג ⟷ ר\n\
וכן הלאה...";

pub const CONVERT_PROMPT: &str = "✍️ שלח לי את הטקסט שתרצה להמיר לאתבש";

pub const NO_STATS: &str = "עדיין אין לך סטטיסטיקות 😊";

pub const GUESS_CORRECT: &str = "🎉 כל הכבוד! ניחשת נכון!";

pub const GUESS_INCORRECT: &str = "❌ לא נכון, נסה שוב!";

/// Menu shown on /start and after most replies
pub fn main_menu() -> Vec<MenuOption> {
    vec![
        MenuOption::new("🔄 המר טקסט לאתבש", Action::Convert),
        MenuOption::new("❓ עובדה מעניינת", Action::Fact),
        MenuOption::new("🎲 משחק ניחושים", Action::Game),
        MenuOption::new("📊 סטטיסטיקות", Action::Stats),
    ]
}

/// Menu attached to a converted text
pub fn conversion_menu() -> Vec<MenuOption> {
    vec![
        MenuOption::new("♻️ המר שוב", Action::Convert),
        MenuOption::new("📝 הסבר על התהליך", Action::Explain),
        MenuOption::new("📊 הסטטיסטיקות שלי", Action::Stats),
    ]
}

pub fn conversion(converted: &str) -> String {
    format!("הטקסט באתבש:\n{}\n\nמה תרצה לעשות עכשיו?", converted)
}

pub fn fact(fact: &str) -> String {
    format!("💡 {}", fact)
}

pub fn puzzle(ciphered: &str) -> String {
    format!(
        "🎮 משחק ניחושים!\nהמילה באתבש היא: {}\nנסה לנחש את המילה המקורית!",
        ciphered
    )
}

pub fn stats(stats: &UserStats, date: &str) -> String {
    format!(
        "📊 הסטטיסטיקות שלך:\nמספר הודעות: {}\nמספר תווים: {}\nתאריך: {}",
        stats.message_count, stats.character_count, date
    )
}

pub fn unknown_command(name: &str) -> String {
    format!("פקודה לא מוכרת: /{}\nבחר אחת מהאפשרויות הבאות:", name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menus_use_distinct_actions() {
        let main: Vec<Action> = main_menu().iter().map(|o| o.action).collect();
        assert_eq!(main, vec![Action::Convert, Action::Fact, Action::Game, Action::Stats]);

        let after: Vec<&str> = conversion_menu().iter().map(|o| o.action_tag()).collect();
        assert_eq!(after, vec!["convert", "explain", "stats"]);
    }

    #[test]
    fn test_stats_text_contains_counts() {
        let text = stats(
            &UserStats {
                message_count: 3,
                character_count: 42,
            },
            "2024-01-01 10:00",
        );
        assert!(text.contains("מספר הודעות: 3"));
        assert!(text.contains("מספר תווים: 42"));
        assert!(text.contains("2024-01-01 10:00"));
    }
}
