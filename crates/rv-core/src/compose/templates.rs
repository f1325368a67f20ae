//! Poem templates keyed by (style, mood). `{theme}` marks every spot where
//! the caller's theme is substituted.

use crate::models::{Mood, Style};

pub const THEME_PLACEHOLDER: &str = "{theme}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoemTemplate {
    pub title: &'static str,
    pub content: &'static str,
}

/// Entry used for any (style, mood) pair missing from a table.
pub const FALLBACK: PoemTemplate = PoemTemplate {
    title: "{theme}的沉思",
    content: "在{theme}的怀抱中\n时间仿佛静止\n每一丝微风\n都在诉说着永恒\n\n心灵找到了栖息\n在这片宁静的天地",
};

const BUILTIN: &[(Style, Mood, PoemTemplate)] = &[
    // classical
    (
        Style::Classical,
        Mood::Peaceful,
        PoemTemplate {
            title: "静夜思",
            content: "明月照窗前，\n清风抚琴弦。\n{theme}意悠然，\n诗心自安闲。",
        },
    ),
    (
        Style::Classical,
        Mood::Joyful,
        PoemTemplate {
            title: "春日吟",
            content: "{theme}映春晖，\n百花齐争妍。\n欢声笑语间，\n诗意满人间。",
        },
    ),
    (
        Style::Classical,
        Mood::Melancholic,
        PoemTemplate {
            title: "{theme}愁",
            content: "{theme}惹离愁，\n秋风落叶稠。\n天涯孤旅客，\n何处是归舟。",
        },
    ),
    (
        Style::Classical,
        Mood::Romantic,
        PoemTemplate {
            title: "{theme}相思",
            content: "{theme}寄相思，\n红豆满南枝。\n月下花前约，\n此情君可知。",
        },
    ),
    (
        Style::Classical,
        Mood::Contemplative,
        PoemTemplate {
            title: "观{theme}",
            content: "独坐观{theme}，\n浮云自去来。\n千年如一瞬，\n心镜本无埃。",
        },
    ),
    (
        Style::Classical,
        Mood::Passionate,
        PoemTemplate {
            title: "{theme}行",
            content: "{theme}壮山河，\n长风万里歌。\n男儿凌云志，\n策马踏金戈。",
        },
    ),
    // modern
    (Style::Modern, Mood::Peaceful, FALLBACK),
    (
        Style::Modern,
        Mood::Joyful,
        PoemTemplate {
            title: "{theme}的欢歌",
            content: "当{theme}绽放笑颜\n整个世界都明亮起来\n欢乐如泉水般涌出\n洒满每一个角落\n\n让我们一起歌唱\n歌颂这美好时光",
        },
    ),
    (
        Style::Modern,
        Mood::Melancholic,
        PoemTemplate {
            title: "{theme}的叹息",
            content: "当{theme}悄悄远去\n雨落在空荡的街\n回忆是一封\n寄不出的信\n\n我在黄昏里等待\n等一个不会回来的季节",
        },
    ),
    (
        Style::Modern,
        Mood::Romantic,
        PoemTemplate {
            title: "致{theme}",
            content: "你是{theme}里\n最温柔的那一束光\n我把心事写成星星\n挂在你的窗前\n\n愿每一个夜晚\n都有你的名字",
        },
    ),
    (
        Style::Modern,
        Mood::Contemplative,
        PoemTemplate {
            title: "关于{theme}",
            content: "{theme}是一面镜子\n照见来路与归途\n我们在其中寻找\n也在其中迷失\n\n答案或许从未存在\n提问本身就是意义",
        },
    ),
    (
        Style::Modern,
        Mood::Passionate,
        PoemTemplate {
            title: "{theme}之歌",
            content: "为了{theme}\n我愿燃烧成火焰\n穿过黑夜与风暴\n奔向黎明的地平线\n\n让热血沸腾\n让梦想在胸中呐喊",
        },
    ),
    // haiku
    (
        Style::Haiku,
        Mood::Peaceful,
        PoemTemplate {
            title: "静",
            content: "{theme}静悄悄\n月光洒满庭院\n心也安宁了",
        },
    ),
    (
        Style::Haiku,
        Mood::Joyful,
        PoemTemplate {
            title: "喜",
            content: "{theme}展笑颜\n春风拂过心田\n欢喜满人间",
        },
    ),
    (
        Style::Haiku,
        Mood::Melancholic,
        PoemTemplate {
            title: "愁",
            content: "{theme}渐远去\n落叶随风飘零\n独自听秋雨",
        },
    ),
    (
        Style::Haiku,
        Mood::Romantic,
        PoemTemplate {
            title: "恋",
            content: "{theme}微微甜\n樱花飘落肩头\n心跳轻如蝶",
        },
    ),
    (
        Style::Haiku,
        Mood::Contemplative,
        PoemTemplate {
            title: "思",
            content: "{theme}问何处\n古池蛙跃水声\n万物皆空明",
        },
    ),
    (
        Style::Haiku,
        Mood::Passionate,
        PoemTemplate {
            title: "烈",
            content: "{theme}如烈焰\n夏日蝉鸣震耳\n热血正沸腾",
        },
    ),
    // prose
    (
        Style::Prose,
        Mood::Peaceful,
        PoemTemplate {
            title: "{theme}小记",
            content: "午后的阳光很轻，{theme}也很轻。\n我坐在窗边，听时间慢慢流过，\n像一条不急不缓的小河，\n把所有的喧嚣都带向远方。",
        },
    ),
    (
        Style::Prose,
        Mood::Joyful,
        PoemTemplate {
            title: "{theme}的礼物",
            content: "{theme}来的那天，风里都是笑声。\n孩子们追着光奔跑，花儿们争着开放，\n整个世界像一封拆开的信，\n每一行都写着欢喜。",
        },
    ),
    (
        Style::Prose,
        Mood::Melancholic,
        PoemTemplate {
            title: "{theme}的余温",
            content: "{theme}走后，屋子里空了许多。\n桌上的茶早已凉透，\n窗外的雨下了一整夜，\n我数着雨声，也数着想念。",
        },
    ),
    (
        Style::Prose,
        Mood::Romantic,
        PoemTemplate {
            title: "写给{theme}",
            content: "如果{theme}有颜色，那一定是你眼里的温柔。\n我们走过长长的街，\n影子在路灯下交叠，\n仿佛这一生都不必说再见。",
        },
    ),
    (
        Style::Prose,
        Mood::Contemplative,
        PoemTemplate {
            title: "{theme}随想",
            content: "我常常想，{theme}究竟是什么。\n它像山间的雾，看得见却握不住；\n它像远方的钟声，听得到却寻不着。\n也许生活的意义，就藏在这份追问里。",
        },
    ),
    (
        Style::Prose,
        Mood::Passionate,
        PoemTemplate {
            title: "{theme}宣言",
            content: "我要为{theme}奔跑，哪怕前路荆棘遍布。\n心中的火从未熄灭，\n它照亮每一个不眠的夜，\n也点燃每一个崭新的黎明。",
        },
    ),
];

/// Lookup table of poem templates.
#[derive(Debug, Clone, Copy)]
pub struct PoemTemplates {
    entries: &'static [(Style, Mood, PoemTemplate)],
}

impl PoemTemplates {
    /// Table covering every (style, mood) pair.
    pub fn builtin() -> Self {
        Self { entries: BUILTIN }
    }

    /// Table over an arbitrary, possibly sparse, set of entries.
    pub fn from_static(entries: &'static [(Style, Mood, PoemTemplate)]) -> Self {
        Self { entries }
    }

    pub fn get(&self, style: Style, mood: Mood) -> Option<&'static PoemTemplate> {
        self.entries
            .iter()
            .find(|(s, m, _)| *s == style && *m == mood)
            .map(|(_, _, template)| template)
    }

    /// Like [`get`](Self::get) but substitutes [`FALLBACK`] for missing pairs.
    pub fn lookup(&self, style: Style, mood: Mood) -> &'static PoemTemplate {
        self.get(style, mood).unwrap_or(&FALLBACK)
    }
}

impl Default for PoemTemplates {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_covers_every_pair_exactly_once() {
        let table = PoemTemplates::builtin();
        for style in Style::ALL {
            for mood in Mood::ALL {
                let hits = BUILTIN
                    .iter()
                    .filter(|(s, m, _)| *s == style && *m == mood)
                    .count();
                assert_eq!(hits, 1, "{style}/{mood}");
                assert!(table.get(style, mood).is_some());
            }
        }
    }

    #[test]
    fn every_body_mentions_the_theme() {
        for (style, mood, template) in BUILTIN {
            assert!(
                template.content.contains(THEME_PLACEHOLDER),
                "{style}/{mood} body never uses the theme"
            );
        }
    }

    #[test]
    fn sparse_table_falls_back_to_modern_peaceful() {
        static SPARSE: &[(Style, Mood, PoemTemplate)] = &[(
            Style::Haiku,
            Mood::Peaceful,
            PoemTemplate { title: "静", content: "{theme}" },
        )];
        let table = PoemTemplates::from_static(SPARSE);
        assert_eq!(table.lookup(Style::Prose, Mood::Joyful), &FALLBACK);
        assert_eq!(
            table.lookup(Style::Prose, Mood::Joyful),
            PoemTemplates::builtin().lookup(Style::Modern, Mood::Peaceful)
        );
        assert_eq!(table.lookup(Style::Haiku, Mood::Peaceful).title, "静");
    }
}
