//! Built-in stopword lists.

/// Common English function words.
pub const ENGLISH: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any",
    "are", "as", "at", "be", "because", "been", "before", "being", "below", "between", "both",
    "but", "by", "can", "cannot", "could", "did", "do", "does", "doing", "done", "down", "during",
    "each", "etc", "even", "ever", "every", "few", "for", "from", "further", "get", "gets", "got",
    "had", "has", "have", "having", "he", "her", "here", "hers", "herself", "him", "himself",
    "his", "how", "however", "i", "if", "in", "into", "is", "it", "its", "itself", "just", "let",
    "like", "made", "make", "many", "may", "me", "might", "more", "most", "much", "must", "my",
    "myself", "need", "needs", "no", "nor", "not", "now", "of", "off", "often", "on", "once",
    "one", "only", "or", "other", "our", "ours", "ourselves", "out", "over", "own", "same",
    "see", "she", "should", "so", "some", "such", "than", "that", "the", "their", "theirs",
    "them", "themselves", "then", "there", "these", "they", "this", "those", "through", "to",
    "too", "two", "under", "until", "up", "us", "use", "used", "uses", "using", "very", "via",
    "was", "way", "we", "well", "were", "what", "when", "where", "whether", "which", "while",
    "who", "whom", "why", "will", "with", "within", "without", "would", "yet", "you", "your",
    "yours", "yourself", "yourselves",
    // contraction stems left behind when "don't" splits at the apostrophe
    "aren", "couldn", "didn", "doesn", "don", "hasn", "haven", "isn", "ll", "re", "shouldn",
    "ve", "wasn", "weren", "won", "wouldn",
];

/// Common Chinese function words and fillers.
pub const CHINESE: &[&str] = &[
    "的", "了", "在", "是", "我", "有", "和", "就", "不", "人", "都", "一", "一个", "上", "也",
    "很", "到", "说", "要", "去", "你", "会", "着", "没有", "看", "好", "自己", "这", "那",
    "这个", "那个", "这些", "那些", "这样", "那样", "我们", "你们", "他们", "她们", "它们",
    "什么", "怎么", "怎样", "为什么", "因为", "所以", "但是", "可是", "然后", "而且", "或者",
    "如果", "虽然", "还是", "只是", "已经", "可以", "需要", "应该", "通过", "进行", "使用",
    "以及", "及其", "对于", "关于", "其中", "之后", "之前", "以后", "以前", "时候", "现在",
    "比如", "例如", "一些", "一下", "一种", "这种", "那种", "所有", "其他", "其它", "每个",
    "非常", "比较", "更", "最", "再", "又", "还", "与", "及", "或", "而", "被", "把", "让",
    "给", "从", "向", "对", "为", "以", "之", "于", "其", "此", "并", "等", "等等", "吗", "呢",
    "吧", "啊", "呀", "哦", "嗯", "中", "里", "内", "外", "后", "前", "能", "可能", "如何",
    "即", "则", "另外", "同时", "由于", "因此", "如下", "以下", "以上", "就是", "还有", "不是",
];

/// Tokens that come from markup, paths and URLs rather than prose.
pub const MARKUP: &[&str] = &[
    "http", "https", "www", "com", "org", "html", "png", "jpg", "jpeg", "gif", "svg", "webp",
    "img", "src", "alt", "md", "nbsp",
];
