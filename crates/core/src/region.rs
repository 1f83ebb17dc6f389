//! Region classification for outbound tags.
//!
//! The pattern table is pure data: an ordered list of (flag label, regex)
//! pairs. Order is semantically significant — the first matching pattern
//! wins on ambiguous tags — so entries must never be reordered. The
//! `regex` crate has no lookaround, so the handful of entries that need
//! "not preceded by"/"not followed by" guards are written as expanded
//! alternations with the same effect.

use artcanvas_common::config::routing::DEFAULT_REGION_ALLOW_LIST;
use artcanvas_common::types::{OutboundDescriptor, RegionGroup};
use once_cell::sync::Lazy;
use regex::Regex;

#[rustfmt::skip]
const REGION_PATTERN_TABLE: &[(&str, &str)] = &[
    ("🇭🇰", r"香港|沪港|呼港|中港|HKT|HKBN|HGC|WTT|CMI|穗港|广港|京港|🇭🇰|HK|Hongkong|Hong Kong|HongKong|HONG KONG"),
    ("🇹🇼", r"台湾|台灣|臺灣|台北|台中|新北|彰化|台|CHT|HINET|TW|Taiwan|TAIWAN"),
    ("🇸🇬", r"新加坡|狮城|獅城|沪新|京新|泉新|穗新|深新|杭新|广新|廣新|滬新|SG|Singapore|SINGAPORE"),
    ("🇯🇵", r"日本|东京|東京|大阪|埼玉|京日|苏日|沪日|广日|上日|穗日|川日|中日|泉日|杭日|深日|JP|Japan|JAPAN"),
    // US must not fire on AUS/RUS ("not preceded by A or R")
    ("🇺🇸", r"美国|美國|京美|硅谷|凤凰城|洛杉矶|西雅图|圣何塞|芝加哥|哥伦布|纽约|广美|(^|[^AR])US\d*|USA|America|United States"),
    // KR must not fire on "North Korea" ("not preceded by North ")
    ("🇰🇷", r"韩国|韓國|首尔|首爾|韩|韓|春川|KOR|KR|Kr|(^|[^\s])Korea|(^|[^h])\sKorea|(^|[^t])h\sKorea|(^|[^r])th\sKorea|(^|[^o])rth\sKorea|(^|[^N])orth\sKorea"),
    ("🇰🇵", r"朝鲜|KP|North Korea"),
    ("🇷🇺", r"俄罗斯|俄羅斯|毛子|俄国|RU|RUS|Russia"),
    // IN must not fire on INFO ("not followed by FO")
    ("🇮🇳", r"印度|孟买|(\s|-)?(IN\d|IN$|IN[^F]|INF[^O])|IND|India|INDIA|Mumbai"),
    ("🇮🇩", r"印尼|印度尼西亚|雅加达|ID|IDN|Indonesia"),
    ("🇬🇧", r"英国|英國|伦敦|UK|England|United Kingdom|Britain"),
    ("🇩🇪", r"德国|德國|法兰克福|(\s|-)?DE\d*|(\s|-)?GER\d*|🇩🇪|German|GERMAN"),
    // FR must not fire on FREE ("not followed by EE")
    ("🇫🇷", r"法国|法國|巴黎|FR$|FR[^E]|FRE[^E]|France"),
    ("🇩🇰", r"丹麦|丹麥|DK|DNK|Denmark"),
    ("🇳🇴", r"挪威|(\s|-)?NO\d*|Norway"),
    ("🇮🇹", r"意大利|義大利|米兰|(\s|-)?IT\d*|Italy|Nachash"),
    ("🇻🇦", r"梵蒂冈|梵蒂岡|(\s|-)?VA\d*|Vatican City"),
    ("🇧🇪", r"比利时|比利時|(\s|-)?BE\d*|Belgium"),
    ("🇦🇺", r"澳大利亚|澳洲|墨尔本|悉尼|(\s|-)?AU\d*|Australia|Sydney"),
    ("🇨🇦", r"加拿大|蒙特利尔|温哥华|多伦多|多倫多|滑铁卢|楓葉|枫叶|CA|CAN|Waterloo|Canada|CANADA"),
    ("🇲🇾", r"马来西亚|马来|馬來|MY|Malaysia|MALAYSIA"),
    ("🇹🇷", r"土耳其|伊斯坦布尔|(\s|-)?TR\d|TR_|TUR|Turkey"),
    ("🇵🇭", r"菲律宾|菲律賓|(\s|-)?PH\d*|Philippines"),
    ("🇹🇭", r"泰国|泰國|曼谷|(\s|-)?TH\d*|Thailand"),
    ("🇻🇳", r"越南|胡志明市|(\s|-)?VN\d*|Vietnam"),
    ("🇺🇦", r"乌克兰|烏克蘭|(\s|-)?UA\d*|Ukraine"),
    ("🇭🇺", r"匈牙利|(\s|-)?HU\d*|Hungary"),
    ("🇨🇭", r"瑞士|苏黎世|(\s|-)?CH\d*|Switzerland"),
    ("🇸🇪", r"瑞典|SE|Sweden"),
    ("🇱🇺", r"卢森堡|(\s|-)?LU\d*|Luxembourg"),
    ("🇦🇹", r"奥地利|奧地利|维也纳|(\s|-)?AT\d*|Austria"),
    ("🇨🇿", r"捷克|(\s|-)?CZ\d*|Czechia"),
    // GR must not fire on GRPC ("not followed by PC")
    ("🇬🇷", r"希腊|希臘|(\s|-)?(GR\d|GR$|GR[^P]|GRP[^C])|Greece"),
    ("🇮🇸", r"冰岛|冰島|(\s|-)?IS\d*|ISL|Iceland"),
    ("🇳🇿", r"新西兰|新西蘭|(\s|-)?NZ\d*|New Zealand"),
    // IE must not fire on IEPL ("not followed by PL")
    ("🇮🇪", r"爱尔兰|愛爾蘭|都柏林|(\s|-)?(IE\d|IE$|IE[^P]|IEP[^L])|Ireland|IRELAND"),
    ("🇮🇲", r"马恩岛|馬恩島|(\s|-)?IM\d*|Mannin|Isle of Man"),
    ("🇱🇹", r"立陶宛|(\s|-)?LT\d*|Lithuania"),
    ("🇫🇮", r"芬兰|芬蘭|赫尔辛基|(\s|-)?FI\d*|Finland"),
    ("🇺🇾", r"乌拉圭|烏拉圭|(\s|-)?UY\d*|Uruguay"),
    ("🇵🇾", r"巴拉圭|(\s|-)?PY\d*|Paraguay"),
    // JM must not fire on JMS ("not followed by S")
    ("🇯🇲", r"牙买加|牙買加|(\s|-)?(JM\d|JM$|JM[^S])|Jamaica"),
    ("🇪🇸", r"西班牙|\b(\s|-)?ES\d*|Spain"),
    ("🇵🇹", r"葡萄牙|Portugal"),
    ("🇮🇱", r"以色列|(\s|-)?IL\d*|Israel"),
    ("🇸🇦", r"沙特|利雅得|吉达|Saudi|Saudi Arabia"),
    ("🇲🇳", r"蒙古|(\s|-)?MN\d*|Mongolia"),
    ("🇦🇪", r"阿联酋|迪拜|(\s|-)?AE\d*|Dubai|United Arab Emirates"),
    ("🇦🇿", r"阿塞拜疆|(\s|-)?AZ\d*|Azerbaijan"),
    ("🇦🇲", r"亚美尼亚|亞美尼亞|(\s|-)?AM\d*|Armenia"),
    ("🇰🇿", r"哈萨克斯坦|哈薩克斯坦|(\s|-)?KZ\d*|Kazakhstan"),
    ("🇰🇬", r"吉尔吉斯坦|吉尔吉斯斯坦|(\s|-)?KG\d*|Kyrghyzstan"),
    ("🇺🇿", r"乌兹别克斯坦|烏茲別克斯坦|(\s|-)?UZ\d*|Uzbekistan"),
    // BR must not fire on GBR ("not preceded by G")
    ("🇧🇷", r"巴西|圣保罗|维涅杜|(^|[^G])BR|Brazil"),
    ("🇨🇱", r"智利|(\s|-)?CL\d*|Chile|CHILE"),
    ("🇵🇪", r"秘鲁|祕魯|(\s|-)?PE\d*|Peru"),
    ("🇨🇺", r"古巴|Cuba"),
    ("🇯🇴", r"约旦|約旦|(\s|-)?JO\d*|Jordan"),
    // GE must not fire on GER ("not followed by R")
    ("🇬🇪", r"格鲁吉亚|格魯吉亞|(\s|-)?(GE\d|GE$|GE[^R])|Georgia"),
    ("🇸🇲", r"圣马力诺|聖馬利諾|(\s|-)?SM\d*|San Marino"),
    ("🇳🇵", r"尼泊尔|(\s|-)?NP\d*|Nepal"),
    ("🇦🇽", r"奥兰群岛|奧蘭群島|(\s|-)?AX\d*|Åland"),
    ("🇸🇮", r"斯洛文尼亚|斯洛文尼亞|(\s|-)?SI\d*|Slovenia"),
    ("🇦🇱", r"阿尔巴尼亚|阿爾巴尼亞|(\s|-)?AL\d*|Albania"),
    // TL must not fire on TLS ("not followed by S")
    ("🇹🇱", r"东帝汶|東帝汶|(\s|-)?(TL\d|TL$|TL[^S])|East Timor"),
    ("🇵🇦", r"巴拿马|巴拿馬|(\s|-)?PA\d*|Panama"),
    ("🇧🇲", r"百慕大|(\s|-)?BM\d*|Bermuda"),
    // RE must not fire on RELAY ("not followed by LAY")
    ("🇷🇪", r"留尼汪|留尼旺|(\s|-)?(RE\d|RE$|RE[^L]|REL[^A]|RELA[^Y])|Réunion|Reunion"),
    ("🇿🇦", r"南非|约翰内斯堡|(\s|-)?ZA\d*|South Africa|Johannesburg"),
    ("🇪🇬", r"埃及|(\s|-)?EG\d*|Egypt"),
    ("🇬🇭", r"加纳|(\s|-)?GH\d*|Ghana"),
    ("🇲🇱", r"马里|馬里|(\s|-)?ML\d*|Mali"),
    ("🇲🇦", r"摩洛哥|(\s|-)?MA\d*|Morocco"),
    ("🇹🇳", r"突尼斯|(\s|-)?TN\d*|Tunisia"),
    ("🇱🇾", r"利比亚|(\s|-)?LY\d*|Libya"),
    ("🇰🇪", r"肯尼亚|肯尼亞|(\s|-)?KE\d*|Kenya"),
    ("🇷🇼", r"卢旺达|盧旺達|(\s|-)?RW\d*|Rwanda"),
    ("🇨🇻", r"佛得角|維德角|(\s|-)?CV\d*|Cape Verde"),
    ("🇦🇴", r"安哥拉|(\s|-)?AO\d*|Angola"),
    ("🇳🇬", r"尼日利亚|尼日利亞|拉各斯|(\s|-)?NG\d*|Nigeria"),
    ("🇲🇺", r"毛里求斯|(\s|-)?MU\d*|Mauritius"),
    ("🇴🇲", r"阿曼|(\s|-)?OM\d*|Oman"),
    ("🇧🇭", r"巴林|(\s|-)?BH\d*|Bahrain"),
    ("🇮🇶", r"伊拉克|(\s|-)?IQ\d*|Iraq"),
    ("🇮🇷", r"伊朗|(\s|-)?IR\d*|Iran"),
    ("🇦🇫", r"阿富汗|(\s|-)?AF\d*|Afghanistan"),
    ("🇵🇰", r"巴基斯坦|(\s|-)?PK\d*|Pakistan|PAKISTAN"),
    ("🇶🇦", r"卡塔尔|卡塔爾|(\s|-)?QA\d*|Qatar"),
    ("🇸🇾", r"叙利亚|敘利亞|(\s|-)?SY\d*|Syria"),
    ("🇱🇰", r"斯里兰卡|斯里蘭卡|(\s|-)?LK\d*|Sri Lanka"),
    ("🇻🇪", r"委内瑞拉|(\s|-)?VE\d*|Venezuela"),
    ("🇬🇹", r"危地马拉|(\s|-)?GT\d*|Guatemala"),
    ("🇵🇷", r"波多黎各|(\s|-)?PR\d*|Puerto Rico"),
    ("🇰🇾", r"开曼群岛|開曼群島|盖曼群岛|凯门群岛|(\s|-)?KY\d*|Cayman Islands"),
    ("🇸🇯", r"斯瓦尔巴|扬马延|(\s|-)?SJ\d*|Svalbard|Mayen"),
    ("🇭🇳", r"洪都拉斯|Honduras"),
    ("🇳🇮", r"尼加拉瓜|(\s|-)?NI\d*|Nicaragua"),
    ("🇦🇶", r"南极|南極|(\s|-)?AQ\d*|Antarctica"),
    // CN must not fire on CN2GIA ("not followed by 2GIA")
    ("🇨🇳", r"中国|中國|江苏|北京|上海|广州|深圳|杭州|徐州|青岛|宁波|镇江|沈阳|济南|回国|back|(\s|-)?(CN$|CN[^2]|CN2$|CN2[^G]|CN2G$|CN2G[^I]|CN2GI$|CN2GI[^A])|China"),
];

static REGION_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    REGION_PATTERN_TABLE
        .iter()
        .map(|(label, pattern)| {
            let regex = Regex::new(pattern).expect("region pattern must compile");
            (*label, regex)
        })
        .collect()
});

/// Group outbound tags by region.
///
/// Each tag is tested against the table in order and lands in the first
/// matching region only; tags matching nothing are not grouped (but stay
/// valid outbounds). Regions appear in first-seen order, members in
/// input order.
pub fn classify(outbounds: &[OutboundDescriptor]) -> Vec<(&'static str, Vec<String>)> {
    let mut groups: Vec<(&'static str, Vec<String>)> = Vec::new();

    for outbound in outbounds {
        if outbound.tag.is_empty() {
            continue;
        }

        for (label, pattern) in REGION_PATTERNS.iter() {
            if pattern.is_match(&outbound.tag) {
                match groups.iter_mut().find(|(seen, _)| seen == label) {
                    Some((_, tags)) => tags.push(outbound.tag.clone()),
                    None => groups.push((*label, vec![outbound.tag.clone()])),
                }
                break;
            }
        }
    }

    groups
}

/// Materialize selector groups for the allow-listed regions.
///
/// Classification for other regions is computed but discarded; a region
/// with no members never produces a group.
pub fn build_region_groups(
    classification: Vec<(&'static str, Vec<String>)>,
    allow_list: &[&str],
) -> Vec<RegionGroup> {
    classification
        .into_iter()
        .filter(|(label, tags)| allow_list.contains(label) && !tags.is_empty())
        .map(|(label, tags)| RegionGroup::new(label, tags))
        .collect()
}

/// Build selector groups with the default region allow-list.
pub fn build_default_region_groups(
    classification: Vec<(&'static str, Vec<String>)>,
) -> Vec<RegionGroup> {
    build_region_groups(classification, &DEFAULT_REGION_ALLOW_LIST)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outbound(tag: &str) -> OutboundDescriptor {
        OutboundDescriptor {
            tag: tag.to_string(),
            outbound_type: "shadowsocks".to_string(),
            server: "example.com".to_string(),
            server_port: 8388,
            method: "aes-128-gcm".to_string(),
            password: "pw".to_string(),
            domain_resolver: "dns_local".to_string(),
            tcp_fast_open: true,
        }
    }

    fn classify_one(tag: &str) -> Option<&'static str> {
        classify(&[outbound(tag)]).first().map(|(label, _)| *label)
    }

    #[test]
    fn test_basic_classification() {
        assert_eq!(classify_one("香港 IPLC 01"), Some("🇭🇰"));
        assert_eq!(classify_one("US West 2"), Some("🇺🇸"));
        assert_eq!(classify_one("Tokyo JP"), Some("🇯🇵"));
        assert_eq!(classify_one("🇭🇰 Premium"), Some("🇭🇰"));
    }

    #[test]
    fn test_unmatched_tag_stays_ungrouped() {
        assert_eq!(classify_one("mystery-node-42"), None);
    }

    #[test]
    fn test_first_table_entry_wins_on_ambiguous_tag() {
        // Matches both 台湾 (entry 2) and 美国 (entry 5); table order decides
        assert_eq!(classify_one("台湾美国混合"), Some("🇹🇼"));
        // Matches both 香港 (entry 1) and 日本 (entry 4)
        assert_eq!(classify_one("香港日本中转"), Some("🇭🇰"));
    }

    #[test]
    fn test_guarded_patterns() {
        // AUS/RUS must not classify as US
        assert_eq!(classify_one("AUS-Sydney"), Some("🇦🇺"));
        assert_eq!(classify_one("RUS Moscow"), Some("🇷🇺"));
        // North Korea is KP, not KR
        assert_eq!(classify_one("North Korea"), Some("🇰🇵"));
        assert_eq!(classify_one("South Korea"), Some("🇰🇷"));
        // CN2GIA transit naming must not classify as CN by itself
        assert_eq!(classify_one("CN2GIA"), None);
        assert_eq!(classify_one("回国 CN2GIA"), Some("🇨🇳"));
    }

    #[test]
    fn test_member_and_region_order_preserved() {
        let outbounds = vec![
            outbound("JP-01"),
            outbound("HK-01"),
            outbound("JP-02"),
            outbound("unclassified"),
        ];

        let classification = classify(&outbounds);
        assert_eq!(classification.len(), 2);
        assert_eq!(classification[0].0, "🇯🇵");
        assert_eq!(classification[0].1, vec!["JP-01", "JP-02"]);
        assert_eq!(classification[1].0, "🇭🇰");
        assert_eq!(classification[1].1, vec!["HK-01"]);
    }

    #[test]
    fn test_allow_list_filters_groups() {
        let outbounds = vec![
            outbound("HK-01"),
            outbound("DE-01"),
            outbound("US-01"),
        ];

        let groups = build_default_region_groups(classify(&outbounds));

        let tags: Vec<&str> = groups.iter().map(|g| g.tag.as_str()).collect();
        assert_eq!(tags, vec!["🇭🇰 Region", "🇺🇸 Region"]);
        assert_eq!(groups[0].outbounds, vec!["HK-01"]);
    }

    #[test]
    fn test_empty_input_yields_no_groups() {
        assert!(classify(&[]).is_empty());
        assert!(build_default_region_groups(Vec::new()).is_empty());
    }
}
