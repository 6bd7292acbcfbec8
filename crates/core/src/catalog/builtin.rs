//! The curriculum bundled with the app.
//!
//! Ids mirror the hosted tables this data was exported from, which is why
//! the first stage carries level id 6 and lesson ids run across levels.

use super::Catalog;
use crate::Error;
use crate::model::{
    Conjugation, ContentBlock, ContentType, ConversationTurn, Difficulty, JamoEntry, Lesson,
    LessonId, Level, LevelId, Phrase, QuizKind, QuizQuestion, QuizQuestionId, SpeechRegister,
    SyllableEntry, VocabularyEntry,
};

pub(crate) fn built_in_catalog() -> Catalog {
    build().expect("built-in catalog data is valid")
}

fn build() -> Result<Catalog, Error> {
    let levels = vec![
        Level::new(
            LevelId::new(6),
            1,
            "Basic",
            "Hangeul basics",
            "bg-blue-500",
        )?,
        Level::new(
            LevelId::new(1),
            2,
            "Beginner",
            "Basic vocabulary and sentences",
            "bg-green-500",
        )?,
        Level::new(
            LevelId::new(2),
            3,
            "Intermediate",
            "Grammar and daily conversations",
            "bg-yellow-500",
        )?,
        Level::new(
            LevelId::new(3),
            4,
            "Advanced",
            "Advanced grammar and expressions",
            "bg-red-500",
        )?,
    ];

    let lessons = vec![
        basic_consonants()?,
        basic_vowels()?,
        combining_syllables()?,
        greetings()?,
        numbers()?,
        family()?,
        copula_grammar()?,
        ordering_food()?,
        complex_sentences()?,
        business_korean()?,
    ];

    let quiz_bank = quiz_questions()?;

    Ok(Catalog::new(levels, lessons, quiz_bank)?)
}

// ─── Basic level (Hangeul) ─────────────────────────────────────────────────────

fn basic_consonants() -> Result<Lesson, Error> {
    let entries = [
        ("ㄱ", "g/k", "가방"),
        ("ㄴ", "n", "나무"),
        ("ㄷ", "d/t", "다리"),
        ("ㄹ", "r/l", "라면"),
        ("ㅁ", "m", "마음"),
        ("ㅂ", "b/p", "바다"),
        ("ㅅ", "s", "사과"),
        ("ㅇ", "ng", "아이"),
        ("ㅈ", "j", "자동차"),
        ("ㅊ", "ch", "차"),
        ("ㅋ", "k", "코"),
        ("ㅌ", "t", "토끼"),
        ("ㅍ", "p", "파"),
        ("ㅎ", "h", "하늘"),
    ];

    Ok(Lesson::new(
        LessonId::new(1),
        LevelId::new(6),
        1,
        "Korean Alphabet - Basic Consonants",
        "Learn the basic Korean consonants: ㄱ, ㄴ, ㄷ, ㄹ, ㅁ, ㅂ, ㅅ, ㅇ, ㅈ, ㅊ, ㅋ, ㅌ, ㅍ, ㅎ",
        ContentType::Hangeul,
        Difficulty::Beginner,
        15,
        false,
        vec![ContentBlock::JamoTable {
            title: "Basic Consonants".into(),
            intro: "Korean has 14 basic consonants. Let's learn them one by one:".into(),
            entries: entries.iter().map(|(c, s, w)| jamo(c, s, w)).collect(),
        }],
    )?)
}

fn basic_vowels() -> Result<Lesson, Error> {
    let entries = [
        ("ㅏ", "a", "아버지"),
        ("ㅓ", "eo", "어머니"),
        ("ㅗ", "o", "오늘"),
        ("ㅜ", "u", "우유"),
        ("ㅡ", "eu", "으름"),
        ("ㅣ", "i", "이름"),
    ];

    Ok(Lesson::new(
        LessonId::new(2),
        LevelId::new(6),
        2,
        "Korean Alphabet - Basic Vowels",
        "Learn the basic Korean vowels: ㅏ, ㅓ, ㅗ, ㅜ, ㅡ, ㅣ",
        ContentType::Hangeul,
        Difficulty::Beginner,
        15,
        false,
        vec![ContentBlock::JamoTable {
            title: "Basic Vowels".into(),
            intro: "Korean has 6 basic vowels. Let's learn them:".into(),
            entries: entries.iter().map(|(c, s, w)| jamo(c, s, w)).collect(),
        }],
    )?)
}

fn combining_syllables() -> Result<Lesson, Error> {
    let entries = [
        ("가", "ㄱ + ㅏ", "go"),
        ("나", "ㄴ + ㅏ", "I/me"),
        ("다", "ㄷ + ㅏ", "all"),
        ("라", "ㄹ + ㅏ", "la (musical note)"),
        ("마", "ㅁ + ㅏ", "horse"),
        ("바", "ㅂ + ㅏ", "bar"),
        ("사", "ㅅ + ㅏ", "four"),
        ("아", "ㅇ + ㅏ", "ah"),
        ("자", "ㅈ + ㅏ", "sleep"),
        ("차", "ㅊ + ㅏ", "car"),
    ];

    Ok(Lesson::new(
        LessonId::new(3),
        LevelId::new(6),
        3,
        "Combining Consonants and Vowels",
        "Learn how to combine consonants and vowels to form Korean syllables",
        ContentType::Hangeul,
        Difficulty::Beginner,
        20,
        false,
        vec![ContentBlock::SyllableDrill {
            title: "Forming Syllables".into(),
            intro: "Korean syllables are formed by combining consonants and vowels. Let's practice:"
                .into(),
            entries: entries
                .iter()
                .map(|(s, c, m)| SyllableEntry {
                    syllable: (*s).into(),
                    components: (*c).into(),
                    meaning: (*m).into(),
                })
                .collect(),
        }],
    )?)
}

// ─── Beginner level ────────────────────────────────────────────────────────────

fn greetings() -> Result<Lesson, Error> {
    let entries = [
        ("안녕하세요", "annyeonghaseyo", "Hello (formal)", "annyeonghaseyo.mp3"),
        ("안녕", "annyeong", "Hello (informal)", "annyeong.mp3"),
        ("감사합니다", "gamsahamnida", "Thank you (formal)", "gamsahamnida.mp3"),
        ("고마워요", "gomawoyo", "Thank you (informal)", "gomawoyo.mp3"),
        ("죄송합니다", "joesonghamnida", "Sorry (formal)", "joesonghamnida.mp3"),
        ("미안해요", "mianhaeyo", "Sorry (informal)", "mianhaeyo.mp3"),
        ("네", "ne", "Yes", "ne.mp3"),
        ("아니요", "aniyo", "No", "aniyo.mp3"),
    ];

    Ok(Lesson::new(
        LessonId::new(4),
        LevelId::new(1),
        1,
        "Greetings and Basic Expressions",
        "Learn essential Korean greetings and polite expressions",
        ContentType::Vocabulary,
        Difficulty::Beginner,
        20,
        false,
        vec![ContentBlock::VocabularyList {
            title: "Basic Greetings".into(),
            intro: "Here are the most important Korean greetings:".into(),
            entries: entries.iter().map(|(k, r, e, a)| vocab(k, r, e, a)).collect(),
        }],
    )?)
}

fn numbers() -> Result<Lesson, Error> {
    let entries = [
        ("하나", "hana", "one", "hana.mp3"),
        ("둘", "dul", "two", "dul.mp3"),
        ("셋", "set", "three", "set.mp3"),
        ("넷", "net", "four", "net.mp3"),
        ("다섯", "daseot", "five", "daseot.mp3"),
        ("여섯", "yeoseot", "six", "yeoseot.mp3"),
        ("일곱", "ilgop", "seven", "ilgop.mp3"),
        ("여덟", "yeodeol", "eight", "yeodeol.mp3"),
        ("아홉", "ahop", "nine", "ahop.mp3"),
        ("열", "yeol", "ten", "yeol.mp3"),
    ];

    Ok(Lesson::new(
        LessonId::new(5),
        LevelId::new(1),
        2,
        "Numbers 1-10",
        "Learn Korean numbers from 1 to 10",
        ContentType::Vocabulary,
        Difficulty::Beginner,
        15,
        false,
        vec![ContentBlock::VocabularyList {
            title: "Korean Numbers 1-10".into(),
            intro: "Learn the native Korean numbers:".into(),
            entries: entries.iter().map(|(k, r, e, a)| vocab(k, r, e, a)).collect(),
        }],
    )?)
}

fn family() -> Result<Lesson, Error> {
    let entries = [
        ("가족", "gajok", "family", "gajok.mp3"),
        ("아버지", "abeoji", "father", "abeoji.mp3"),
        ("어머니", "eomeoni", "mother", "eomeoni.mp3"),
        ("형", "hyeong", "older brother (male speaking)", "hyeong.mp3"),
        ("누나", "nuna", "older sister (male speaking)", "nuna.mp3"),
        ("오빠", "oppa", "older brother (female speaking)", "oppa.mp3"),
        ("언니", "eonni", "older sister (female speaking)", "eonni.mp3"),
        ("동생", "dongsaeng", "younger sibling", "dongsaeng.mp3"),
    ];

    Ok(Lesson::new(
        LessonId::new(6),
        LevelId::new(1),
        3,
        "Family Members",
        "Learn vocabulary for family members in Korean",
        ContentType::Vocabulary,
        Difficulty::Beginner,
        20,
        false,
        vec![ContentBlock::VocabularyList {
            title: "Family Vocabulary".into(),
            intro: "Here are the Korean words for family members:".into(),
            entries: entries.iter().map(|(k, r, e, a)| vocab(k, r, e, a)).collect(),
        }],
    )?)
}

// ─── Intermediate level ────────────────────────────────────────────────────────

fn copula_grammar() -> Result<Lesson, Error> {
    Ok(Lesson::new(
        LessonId::new(7),
        LevelId::new(2),
        1,
        "Present Tense - 이다/아니다",
        "Learn how to use the Korean copula 이다 and its negative form 아니다",
        ContentType::Grammar,
        Difficulty::Intermediate,
        25,
        false,
        vec![ContentBlock::GrammarPattern {
            title: "이다 (to be) and 아니다 (to not be)".into(),
            intro: "이다 is the Korean copula meaning 'to be'. Here's how to use it:".into(),
            pattern: "Noun + 이다/아니다".into(),
            examples: vec![
                phrase("저는 학생입니다", "jeoneun haksaengimnida", "I am a student"),
                phrase("이것은 책입니다", "igeoseun chaegimnida", "This is a book"),
                phrase(
                    "저는 선생님이 아닙니다",
                    "jeoneun seonsaengnimi animnida",
                    "I am not a teacher",
                ),
                phrase(
                    "그것은 자동차가 아닙니다",
                    "geugeoseun jadongchaga animnida",
                    "That is not a car",
                ),
            ],
            conjugations: vec![
                Conjugation {
                    register: SpeechRegister::Formal,
                    form: "입니다/아닙니다".into(),
                },
                Conjugation {
                    register: SpeechRegister::Polite,
                    form: "이에요/아니에요".into(),
                },
                Conjugation {
                    register: SpeechRegister::Casual,
                    form: "야/아니야".into(),
                },
            ],
        }],
    )?)
}

fn ordering_food() -> Result<Lesson, Error> {
    let turns = [
        ("Waiter", "어서 오세요. 몇 분이세요?", "eoseo oseyo. myeot buniseyo?", "Welcome. How many people?"),
        ("Customer", "두 명이에요.", "du myeongieyo.", "Two people."),
        ("Waiter", "이쪽으로 오세요.", "ijjogeuro oseyo.", "Please come this way."),
        ("Waiter", "주문하시겠어요?", "jumunhasigesseoyo?", "Are you ready to order?"),
        ("Customer", "김치찌개 하나 주세요.", "gimchijjigae hana juseyo.", "One kimchi stew, please."),
        ("Waiter", "네, 알겠습니다.", "ne, algetseumnida.", "Yes, I understand."),
    ];

    Ok(Lesson::new(
        LessonId::new(8),
        LevelId::new(2),
        2,
        "Daily Conversation - Ordering Food",
        "Learn how to order food in Korean restaurants",
        ContentType::Conversation,
        Difficulty::Intermediate,
        30,
        false,
        vec![ContentBlock::Conversation {
            title: "Ordering Food at a Restaurant".into(),
            intro: "Here's a typical conversation when ordering food:".into(),
            turns: turns
                .iter()
                .map(|(sp, k, r, e)| ConversationTurn {
                    speaker: (*sp).into(),
                    korean: (*k).into(),
                    romanization: (*r).into(),
                    english: (*e).into(),
                })
                .collect(),
        }],
    )?)
}

// ─── Advanced level ────────────────────────────────────────────────────────────

fn complex_sentences() -> Result<Lesson, Error> {
    let patterns = [
        (
            "~면서 (while doing)",
            "음악을 들으면서 공부해요.",
            "eumageul deureumyeonseo gongbuhaeyo.",
            "I study while listening to music.",
        ),
        (
            "~기 때문에 (because)",
            "비가 오기 때문에 집에 있어요.",
            "biga ogi ttaemune jibe isseoyo.",
            "I'm staying home because it's raining.",
        ),
        (
            "~ㄴ/은 후에 (after doing)",
            "밥을 먹은 후에 산책해요.",
            "babeul meogeun hue sanchaekhaeyo.",
            "I take a walk after eating.",
        ),
    ];

    let content = patterns
        .iter()
        .map(|(name, k, r, e)| ContentBlock::GrammarPattern {
            title: "Complex Sentence Patterns".into(),
            intro: "Learn how to create complex sentences in Korean:".into(),
            pattern: (*name).into(),
            examples: vec![phrase(k, r, e)],
            conjugations: Vec::new(),
        })
        .collect();

    Ok(Lesson::new(
        LessonId::new(9),
        LevelId::new(3),
        1,
        "Complex Sentence Structures",
        "Learn advanced Korean sentence patterns and conjunctions",
        ContentType::Grammar,
        Difficulty::Advanced,
        35,
        false,
        content,
    )?)
}

fn business_korean() -> Result<Lesson, Error> {
    let words = [
        ("회의", "hoeui", "meeting", "hoeui.mp3"),
        ("프레젠테이션", "peurejenteisyeon", "presentation", "presentation.mp3"),
        ("계약서", "gyeyakseo", "contract", "gyeyakseo.mp3"),
        ("협상", "hyeopsang", "negotiation", "hyeopsang.mp3"),
        ("제안서", "jeanseo", "proposal", "jeanseo.mp3"),
    ];

    Ok(Lesson::new(
        LessonId::new(10),
        LevelId::new(3),
        2,
        "Business Korean",
        "Learn formal business expressions and email writing",
        ContentType::Conversation,
        Difficulty::Advanced,
        40,
        false,
        vec![
            ContentBlock::VocabularyList {
                title: "Business Korean Expressions".into(),
                intro: "Essential expressions for business situations:".into(),
                entries: words.iter().map(|(k, r, e, a)| vocab(k, r, e, a)).collect(),
            },
            ContentBlock::Expressions {
                title: "Business Korean Expressions".into(),
                intro: "Useful phrases for meetings and email:".into(),
                entries: vec![
                    phrase(
                        "안녕하세요. 저는 [회사명]의 [이름]입니다.",
                        "annyeonghaseyo. jeoneun [hoesaname]ui [ireum]imnida.",
                        "Hello. I am [Name] from [Company].",
                    ),
                    phrase(
                        "회의 시간을 조정해 주시겠어요?",
                        "hoeui siganeul jojeonghae jusigesseoyo?",
                        "Could you please adjust the meeting time?",
                    ),
                    phrase(
                        "제안서를 검토해 보겠습니다.",
                        "jeanseoreul geomtohae bogetseumnida.",
                        "I will review the proposal.",
                    ),
                ],
            },
        ],
    )?)
}

// ─── Quiz bank ─────────────────────────────────────────────────────────────────

fn quiz_questions() -> Result<Vec<QuizQuestion>, Error> {
    Ok(vec![
        QuizQuestion::new(
            QuizQuestionId::new(1),
            QuizKind::Hangeul,
            "What is the romanization of \"안녕하세요\"?",
            vec![
                "annyeonghaseyo".into(),
                "gamsahamnida".into(),
                "joesonghamnida".into(),
                "mianhaeyo".into(),
            ],
            0,
            Some("안녕하세요 means \"Hello\" in Korean.".into()),
            Some("안녕하세요".into()),
            None,
        )?,
        QuizQuestion::new(
            QuizQuestionId::new(2),
            QuizKind::Vocabulary,
            "What does \"감사합니다\" mean?",
            vec![
                "Hello".into(),
                "Thank you".into(),
                "Sorry".into(),
                "Goodbye".into(),
            ],
            1,
            Some("감사합니다 means \"Thank you\" in Korean.".into()),
            Some("감사합니다".into()),
            Some("gamsahamnida".into()),
        )?,
        QuizQuestion::new(
            QuizQuestionId::new(3),
            QuizKind::Hangeul,
            "Which character represents the sound \"g/k\"?",
            vec!["ㄱ".into(), "ㄴ".into(), "ㄷ".into(), "ㄹ".into()],
            0,
            Some("ㄱ represents the \"g/k\" sound in Korean.".into()),
            Some("ㄱ".into()),
            None,
        )?,
        QuizQuestion::new(
            QuizQuestionId::new(4),
            QuizKind::Vocabulary,
            "What does \"물\" mean?",
            vec![
                "Food".into(),
                "Water".into(),
                "House".into(),
                "Friend".into(),
            ],
            1,
            Some("물 means \"Water\" in Korean.".into()),
            Some("물".into()),
            Some("mul".into()),
        )?,
        QuizQuestion::new(
            QuizQuestionId::new(5),
            QuizKind::Pronunciation,
            "How do you pronounce \"학교\"?",
            vec![
                "hak-gyo".into(),
                "hang-yo".into(),
                "hak-kyo".into(),
                "ha-gyo".into(),
            ],
            0,
            Some("학교 means \"School\" and is pronounced \"hak-gyo\".".into()),
            Some("학교".into()),
            Some("hakgyo".into()),
        )?,
    ])
}

// ─── Helpers ───────────────────────────────────────────────────────────────────

fn jamo(character: &str, sound: &str, example_word: &str) -> JamoEntry {
    JamoEntry {
        character: character.into(),
        sound: sound.into(),
        example_word: example_word.into(),
    }
}

fn vocab(korean: &str, romanization: &str, english: &str, audio: &str) -> VocabularyEntry {
    VocabularyEntry {
        korean: korean.into(),
        romanization: romanization.into(),
        english: english.into(),
        audio: Some(audio.into()),
    }
}

fn phrase(korean: &str, romanization: &str, english: &str) -> Phrase {
    Phrase {
        korean: korean.into(),
        romanization: romanization.into(),
        english: english.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_built_in_lesson_has_content() {
        let catalog = built_in_catalog();
        for lesson in catalog.all_lessons() {
            assert!(
                !lesson.content().is_empty(),
                "lesson {} has no content blocks",
                lesson.id()
            );
        }
    }

    #[test]
    fn hangeul_level_holds_three_numbered_lessons() {
        let catalog = built_in_catalog();
        let lessons = catalog.lessons_for_level(LevelId::new(6));
        let numbers: Vec<u32> = lessons.iter().map(|l| l.lesson_number()).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert!(lessons
            .iter()
            .all(|l| l.content_type() == ContentType::Hangeul));
    }

    #[test]
    fn bundled_audio_refs_resolve() {
        let catalog = built_in_catalog();
        for lesson in catalog.all_lessons() {
            for block in lesson.content() {
                if let ContentBlock::VocabularyList { entries, .. } = block {
                    for entry in entries {
                        assert!(entry.audio_ref().is_ok(), "bad audio ref in {}", entry.korean);
                    }
                }
            }
        }
    }

    #[test]
    fn quiz_bank_indices_are_in_range() {
        let catalog = built_in_catalog();
        for question in catalog.quiz_bank() {
            assert!(question.correct_index() < question.options().len());
        }
    }
}
