// Scripted companion replies - the default chat responder when no generative
// source is configured. An ordered decision table: first branch whose trigger
// appears in the lowercased input wins, the last entry is the no-match
// default.

struct Branch {
    triggers: &'static [&'static str],
    reply: &'static str,
    followups: [&'static str; 4],
}

const BRANCHES: &[Branch] = &[
    Branch {
        triggers: &["stress", "overwhelmed"],
        reply: "I hear that you're feeling stressed and overwhelmed. These feelings are completely valid, and it's important to acknowledge them. Stress can feel consuming, but there are ways to manage it. Would you like to explore some coping strategies together?",
        followups: [
            "Tell me about breathing exercises",
            "I need help managing my workload",
            "What are some quick stress relief techniques?",
            "I want to talk about what's causing my stress",
        ],
    },
    Branch {
        triggers: &["anxious", "anxiety", "worried"],
        reply: "Anxiety can be really challenging to deal with, and I want you to know that what you're experiencing is real and valid. Many people struggle with anxious thoughts and feelings. You're not alone in this. Can you tell me more about what's been making you feel anxious lately?",
        followups: [
            "What is the 5-4-3-2-1 grounding technique?",
            "I have racing thoughts",
            "I'm worried about the future",
            "Help me understand my anxiety triggers",
        ],
    },
    Branch {
        triggers: &["sad", "depressed", "down"],
        reply: "I'm sorry you're feeling this way. Sadness and low moods are difficult emotions to carry, but they're also a natural part of the human experience. It's okay to feel sad, and it's brave of you to reach out. Remember that these feelings, while painful, are temporary. What's been weighing on your heart lately?",
        followups: [
            "I don't feel like doing anything",
            "How can I improve my mood?",
            "I feel isolated and alone",
            "Tell me about depression resources",
        ],
    },
    Branch {
        triggers: &["sleep", "tired", "insomnia"],
        reply: "Sleep issues can really impact how we feel during the day. Good sleep is so important for our mental health and overall wellbeing. There are several strategies that can help improve sleep quality. What specific sleep challenges are you experiencing?",
        followups: [
            "I can't fall asleep at night",
            "I wake up frequently during the night",
            "What is good sleep hygiene?",
            "I'm having nightmares",
        ],
    },
    Branch {
        triggers: &["work", "job"],
        reply: "Work-related stress is incredibly common, and it sounds like your job is impacting your wellbeing. It's important to find ways to manage work stress and maintain boundaries. Your mental health matters more than any job. What aspects of work are causing you the most difficulty?",
        followups: [
            "I'm burned out from work",
            "My boss is causing me stress",
            "How do I set work boundaries?",
            "I'm considering changing jobs",
        ],
    },
    Branch {
        triggers: &["relationship", "family", "friend"],
        reply: "Relationships can be both a source of great joy and significant stress. It sounds like you're dealing with some interpersonal challenges. Healthy relationships require communication, boundaries, and mutual respect. What's been happening in your relationships that's concerning you?",
        followups: [
            "I'm having conflict with someone close to me",
            "I feel misunderstood by others",
            "How do I communicate better?",
            "I'm feeling lonely",
        ],
    },
    Branch {
        triggers: &["thank", "better", "good"],
        reply: "I'm so glad to hear that you're feeling better! It's wonderful that you're taking care of your mental health and reaching out for support. Remember that healing isn't always linear - there will be good days and challenging days, and that's completely normal. Keep up the great work in prioritizing your wellbeing.",
        followups: [
            "How can I maintain this positive momentum?",
            "What should I do when I have bad days?",
            "I want to help others who are struggling",
            "Tell me about building resilience",
        ],
    },
];

const DEFAULT_BRANCH: Branch = Branch {
    triggers: &[],
    reply: "Thank you for sharing that with me. I'm here to listen and support you through whatever you're experiencing. Your feelings and experiences are valid, and it takes courage to open up about them. How are you feeling right now, and what would be most helpful for you today?",
    followups: [
        "I'm not sure how I'm feeling",
        "I need coping strategies",
        "I want to understand my emotions better",
        "Can you help me find professional help?",
    ],
};

pub const WELCOME_MESSAGE: &str = "Hello! I'm your AI mental health companion. I'm here to listen, provide support, and help you explore your thoughts and feelings. How are you doing today?";

pub const WELCOME_SUGGESTIONS: [&str; 4] = [
    "I'm feeling stressed about work",
    "I've been having trouble sleeping",
    "I'm feeling anxious lately",
    "I want to talk about my mood",
];

/// Produce the canned empathetic reply and its four follow-up suggestions
/// for the given user input.
pub fn scripted_reply(input: &str) -> (String, Vec<String>) {
    let lowered = input.to_lowercase();
    let branch = BRANCHES
        .iter()
        .find(|branch| branch.triggers.iter().any(|trigger| lowered.contains(trigger)))
        .unwrap_or(&DEFAULT_BRANCH);

    (
        branch.reply.to_string(),
        branch.followups.iter().map(|s| s.to_string()).collect(),
    )
}
