//! Reply templates for the six historical poets. `{message}` is replaced by
//! the user's words; the quoted lines are fixed.

pub const MESSAGE_PLACEHOLDER: &str = "{message}";

/// Used for any name outside the table, including custom agents.
pub const GENERIC_REPLY: &str = "{message}，你说得很有道理。让我们继续探讨诗词之道吧。";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoetVoice {
    pub name: &'static str,
    pub replies: &'static [&'static str],
}

pub const VOICES: &[PoetVoice] = &[
    PoetVoice {
        name: "李白",
        replies: &[
            "哈哈！{message}？吾观此言，颇有见地。人生得意须尽欢，莫使金樽空对月！不如随我一同饮酒赋诗，共赏这大好河山。",
            "{message}，说得好！正如我所言：\"天生我材必有用，千金散尽还复来。\" 人生在世，当纵情山水，潇洒自在。",
            "听君此言，让我想起当年在黄鹤楼所见之景。\"孤帆远影碧空尽，唯见长江天际流。\" {message}确有几分道理啊！",
        ],
    },
    PoetVoice {
        name: "杜甫",
        replies: &[
            "{message}，此言甚是。如今世事艰难，正如我诗中所写：\"安得广厦千万间，大庇天下寒士俱欢颜。\" 愿天下百姓皆能安居乐业。",
            "听闻{message}，不禁让我感慨万千。国破山河在，城春草木深。望君能多关注民生疾苦，心系天下苍生。",
            "{message}，确实如此。正所谓\"烽火连三月，家书抵万金\"，此等世道，更应珍惜眼前，关爱家人。",
        ],
    },
    PoetVoice {
        name: "苏轼",
        replies: &[
            "哈哈哈！{message}？妙哉妙哉！正如我常言：\"人有悲欢离合，月有阴晴圆缺，此事古难全。\" 看开些，一切随缘便好。",
            "听君所言，让我想起当年在黄州。{message}确有道理，但人生无常，不妨豁达些。\"竹杖芒鞋轻胜马，谁怕？一蓑烟雨任平生。\"",
            "{message}说得极是！此情此景，不禁让我想起赤壁之游。\"大江东去，浪淘尽，千古风流人物。\" 人生短暂，当及时行乐！",
        ],
    },
    PoetVoice {
        name: "李清照",
        replies: &[
            "{message}，我听到了你的心声。\"寻寻觅觅，冷冷清清，凄凄惨惨戚戚。\" 人生总有不如意之时，但也不失希望。",
            "你说的{message}，让我想起当年在东篱下采菊的时光。\"帘卷西风，人比黄花瘦。\" 世事无常，唯有珍惜当下。",
            "{message}确实如此。\"生当作人杰，死亦为鬼雄。\" 无论男女，都应有自己的志向和追求，不负此生。",
        ],
    },
    PoetVoice {
        name: "白居易",
        replies: &[
            "{message}，你说得对。我常说\"文章合为时而著，歌诗合为事而作\"，诗歌应当贴近生活，关注民生。",
            "听到{message}，我深有同感。正如我在《长恨歌》中所写，\"在天愿作比翼鸟，在地愿为连理枝。\" 情深意重，令人动容。",
            "{message}，这让我想起江州司马青衫湿的往事。\"同是天涯沦落人，相逢何必曾相识。\" 人生际遇各不相同，但情感相通。",
        ],
    },
    PoetVoice {
        name: "王维",
        replies: &[
            "{message}……嗯，此言有理。\"行到水穷处，坐看云起时。\" 万物有道，顺其自然便好。",
            "阿弥陀佛。{message}，确实如此。\"空山新雨后，天气晚来秋。\" 山水之间，自有禅意，心静方能见真。",
            "听闻{message}，让我想起竹里馆的宁静。\"独坐幽篁里，弹琴复长啸。\" 世间纷扰，不如归隐山林，静心修禅。",
        ],
    },
];

/// Reply candidates for `name`, or `None` for anyone outside the table.
pub fn voice_for(name: &str) -> Option<&'static PoetVoice> {
    VOICES.iter().find(|voice| voice.name == name)
}
