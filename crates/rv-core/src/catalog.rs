//! Reference data for the six historical poets. Hosted deployments ship these
//! rows in their schema; local backends seed them at startup.

use crate::models::NewPoet;

fn poet(
    name: &str,
    dynasty: &str,
    title: &str,
    bio: &str,
    style_description: &str,
    famous_works: &[&str],
    personality_traits: &[&str],
) -> NewPoet {
    NewPoet {
        name: name.to_string(),
        dynasty: dynasty.to_string(),
        title: title.to_string(),
        bio: bio.to_string(),
        style_description: style_description.to_string(),
        famous_works: famous_works.iter().map(|s| s.to_string()).collect(),
        personality_traits: personality_traits.iter().map(|s| s.to_string()).collect(),
    }
}

pub fn ancient_poets() -> Vec<NewPoet> {
    vec![
        poet(
            "李白",
            "唐",
            "诗仙",
            "字太白，号青莲居士，盛唐浪漫主义诗人，一生漫游四方，嗜酒好剑。",
            "想象奇绝，豪放飘逸，善用夸张与比喻。",
            &["静夜思", "将进酒", "望庐山瀑布", "蜀道难"],
            &["豪放", "浪漫", "洒脱", "好酒"],
        ),
        poet(
            "杜甫",
            "唐",
            "诗圣",
            "字子美，自号少陵野老，经历安史之乱，诗作被誉为诗史。",
            "沉郁顿挫，格律严谨，关注民生疾苦。",
            &["春望", "茅屋为秋风所破歌", "登高", "石壕吏"],
            &["忧国忧民", "沉郁", "严谨", "仁厚"],
        ),
        poet(
            "苏轼",
            "宋",
            "东坡居士",
            "字子瞻，号东坡居士，北宋文学家、书画家，仕途屡遭贬谪而豁达自适。",
            "豪放旷达，清新自然，诗词文赋俱佳。",
            &["水调歌头", "念奴娇·赤壁怀古", "定风波", "题西林壁"],
            &["豁达", "幽默", "博学", "乐观"],
        ),
        poet(
            "李清照",
            "宋",
            "千古第一才女",
            "号易安居士，婉约词派代表，前期词风清丽，南渡后多写家国之痛。",
            "婉约细腻，语言清新，情感真挚。",
            &["声声慢", "如梦令", "醉花阴", "夏日绝句"],
            &["婉约", "敏感", "坚韧", "才情横溢"],
        ),
        poet(
            "白居易",
            "唐",
            "诗魔",
            "字乐天，号香山居士，新乐府运动倡导者，诗作通俗易懂，流传甚广。",
            "平易近人，叙事生动，讽喻现实。",
            &["长恨歌", "琵琶行", "卖炭翁", "赋得古原草送别"],
            &["平易", "关怀民生", "多情", "直率"],
        ),
        poet(
            "王维",
            "唐",
            "诗佛",
            "字摩诘，精通诗书画乐，晚年隐居辋川，笃信佛教。",
            "诗中有画，画中有诗，空灵静谧，富于禅意。",
            &["山居秋暝", "鹿柴", "相思", "送元二使安西"],
            &["淡泊", "宁静", "禅意", "多才"],
        ),
    ]
}
