//! DOM element schema.
//!
//! Known HTML elements and the properties a template may bind on them.
//! Events are not validated so the table only encodes properties.

use super::element_schema_registry::{ElementSchemaRegistry, SchemaMetadata};
use crate::ml_parser::tags::{is_ng_container, is_ng_content};
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

/// Encoded element table.
///
/// Each line is `names^parent|properties`:
///
/// - names separated by `,` share one property set
/// - `^parent` inherits the parent's properties
/// - property prefixes `!` (boolean), `#` (number) and `%` (object) mark
///   non-string properties and are dropped when decoded
/// - bracketed names are abstract and never match a tag
static SCHEMA: &[&str] = &[
    "[Element]|textContent,%ariaActiveDescendantElement,%ariaAtomic,%ariaAutoComplete,%ariaBusy,%ariaChecked,%ariaColCount,%ariaColIndex,%ariaColIndexText,%ariaColSpan,%ariaControlsElements,%ariaCurrent,%ariaDescribedByElements,%ariaDescription,%ariaDetailsElements,%ariaDisabled,%ariaErrorMessageElements,%ariaExpanded,%ariaFlowToElements,%ariaHasPopup,%ariaHidden,%ariaInvalid,%ariaKeyShortcuts,%ariaLabel,%ariaLabelledByElements,%ariaLevel,%ariaLive,%ariaModal,%ariaMultiLine,%ariaMultiSelectable,%ariaOrientation,%ariaOwnsElements,%ariaPlaceholder,%ariaPosInSet,%ariaPressed,%ariaReadOnly,%ariaRelevant,%ariaRequired,%ariaRoleDescription,%ariaRowCount,%ariaRowIndex,%ariaRowIndexText,%ariaRowSpan,%ariaSelected,%ariaSetSize,%ariaSort,%ariaValueMax,%ariaValueMin,%ariaValueNow,%ariaValueText,%classList,className,elementTiming,id,innerHTML,outerHTML,%part,#scrollLeft,#scrollTop,slot",
    "[HTMLElement]^[Element]|accessKey,autocapitalize,!autofocus,contentEditable,dir,!draggable,enterKeyHint,!hidden,!inert,innerText,inputMode,lang,nonce,outerText,!spellcheck,%style,#tabIndex,title,!translate,virtualKeyboardPolicy",
    "abbr,address,article,aside,b,bdi,bdo,cite,content,code,dd,dfn,dt,em,figcaption,figure,footer,header,hgroup,i,kbd,main,mark,nav,noscript,rb,rp,rt,rtc,ruby,s,samp,search,section,small,strong,sub,sup,u,var,wbr^[HTMLElement]|accessKey,autocapitalize,!autofocus,contentEditable,dir,!draggable,enterKeyHint,!hidden,innerText,inputMode,lang,nonce,outerText,!spellcheck,%style,#tabIndex,title,!translate,virtualKeyboardPolicy",
    "[HTMLMediaElement]^[HTMLElement]|!autoplay,!controls,%controlsList,%crossOrigin,#currentTime,!defaultMuted,#defaultPlaybackRate,!disableRemotePlayback,!loop,!muted,#playbackRate,preload,!preservesPitch,src,%srcObject,#volume",
    "a^[HTMLElement]|charset,coords,download,hash,host,hostname,href,hreflang,name,password,pathname,ping,port,protocol,referrerPolicy,rel,%relList,rev,search,shape,target,text,type,username",
    "area^[HTMLElement]|alt,coords,download,hash,host,hostname,href,!noHref,password,pathname,ping,port,protocol,referrerPolicy,rel,%relList,search,shape,target,username",
    "audio^[HTMLMediaElement]|",
    "br^[HTMLElement]|clear",
    "base^[HTMLElement]|href,target",
    "body^[HTMLElement]|aLink,background,bgColor,link,text,vLink",
    "button^[HTMLElement]|!disabled,formAction,formEnctype,formMethod,!formNoValidate,formTarget,name,type,value",
    "canvas^[HTMLElement]|#height,#width",
    "content^[HTMLElement]|select",
    "dl^[HTMLElement]|!compact",
    "data^[HTMLElement]|value",
    "datalist^[HTMLElement]|",
    "details^[HTMLElement]|!open",
    "dialog^[HTMLElement]|!open,returnValue",
    "dir^[HTMLElement]|!compact",
    "div^[HTMLElement]|align",
    "embed^[HTMLElement]|align,height,name,src,type,width",
    "fieldset^[HTMLElement]|!disabled,name",
    "font^[HTMLElement]|color,face,size",
    "form^[HTMLElement]|acceptCharset,action,autocomplete,encoding,enctype,method,name,!noValidate,target",
    "frame^[HTMLElement]|frameBorder,longDesc,marginHeight,marginWidth,name,!noResize,scrolling,src",
    "frameset^[HTMLElement]|cols,rows",
    "hr^[HTMLElement]|align,color,!noShade,size,width",
    "head^[HTMLElement]|",
    "h1,h2,h3,h4,h5,h6^[HTMLElement]|align",
    "html^[HTMLElement]|version",
    "iframe^[HTMLElement]|align,allow,!allowFullscreen,!allowPaymentRequest,csp,frameBorder,height,loading,longDesc,marginHeight,marginWidth,name,referrerPolicy,%sandbox,scrolling,src,srcdoc,width",
    "img^[HTMLElement]|align,alt,border,%crossOrigin,decoding,#height,#hspace,!isMap,loading,longDesc,lowsrc,name,referrerPolicy,sizes,src,srcset,useMap,#vspace,#width",
    "input^[HTMLElement]|accept,align,alt,autocomplete,!checked,!defaultChecked,defaultValue,dirName,!disabled,%files,formAction,formEnctype,formMethod,!formNoValidate,formTarget,#height,!incremental,!indeterminate,max,#maxLength,min,#minLength,!multiple,name,pattern,placeholder,!readOnly,!required,selectionDirection,#selectionEnd,#selectionStart,#size,src,step,type,useMap,value,%valueAsDate,#valueAsNumber,#width",
    "li^[HTMLElement]|type,#value",
    "label^[HTMLElement]|htmlFor",
    "legend^[HTMLElement]|align",
    "link^[HTMLElement]|as,charset,%crossOrigin,!disabled,href,hreflang,imageSizes,imageSrcset,integrity,media,referrerPolicy,rel,%relList,rev,%sizes,target,type",
    "map^[HTMLElement]|name",
    "marquee^[HTMLElement]|behavior,bgColor,direction,height,#hspace,#loop,#scrollAmount,#scrollDelay,!trueSpeed,#vspace,width",
    "menu^[HTMLElement]|!compact",
    "meta^[HTMLElement]|content,httpEquiv,media,name,scheme",
    "meter^[HTMLElement]|#high,#low,#max,#min,#optimum,#value",
    "ins,del^[HTMLElement]|cite,dateTime",
    "ol^[HTMLElement]|!compact,!reversed,#start,type",
    "object^[HTMLElement]|align,archive,border,code,codeBase,codeType,data,!declare,height,#hspace,name,standby,type,useMap,#vspace,width",
    "optgroup^[HTMLElement]|!disabled,label",
    "option^[HTMLElement]|!defaultSelected,!disabled,label,!selected,text,value",
    "output^[HTMLElement]|defaultValue,%htmlFor,name,value",
    "p^[HTMLElement]|align",
    "param^[HTMLElement]|name,type,value,valueType",
    "picture^[HTMLElement]|",
    "pre^[HTMLElement]|#width",
    "progress^[HTMLElement]|#max,#value",
    "q,blockquote,cite^[HTMLElement]|",
    "script^[HTMLElement]|!async,charset,%crossOrigin,!defer,event,htmlFor,integrity,!noModule,%referrerPolicy,src,text,type",
    "select^[HTMLElement]|autocomplete,!disabled,#length,!multiple,name,!required,#selectedIndex,#size,value",
    "selectedcontent^[HTMLElement]|",
    "slot^[HTMLElement]|name",
    "source^[HTMLElement]|#height,media,sizes,src,srcset,type,#width",
    "span^[HTMLElement]|",
    "style^[HTMLElement]|!disabled,media,type",
    "search^[HTMLElement]|",
    "caption^[HTMLElement]|align",
    "th,td^[HTMLElement]|abbr,align,axis,bgColor,ch,chOff,#colSpan,headers,height,!noWrap,#rowSpan,scope,vAlign,width",
    "col,colgroup^[HTMLElement]|align,ch,chOff,#span,vAlign,width",
    "table^[HTMLElement]|align,bgColor,border,%caption,cellPadding,cellSpacing,frame,rules,summary,%tFoot,%tHead,width",
    "tr^[HTMLElement]|align,bgColor,ch,chOff,vAlign",
    "tfoot,thead,tbody^[HTMLElement]|align,ch,chOff,vAlign",
    "template^[HTMLElement]|",
    "textarea^[HTMLElement]|autocomplete,#cols,defaultValue,dirName,!disabled,#maxLength,#minLength,name,placeholder,!readOnly,!required,#rows,selectionDirection,#selectionEnd,#selectionStart,value,wrap",
    "time^[HTMLElement]|dateTime",
    "title^[HTMLElement]|text",
    "track^[HTMLElement]|!default,kind,label,src,srclang",
    "ul^[HTMLElement]|!compact,type",
    "unknown^[HTMLElement]|",
    "video^[HTMLMediaElement]|!disablePictureInPicture,#height,!playsInline,poster,#width",
    "keygen^[HTMLElement]|!autofocus,challenge,!disabled,form,keytype,name",
    "menuitem^[HTMLElement]|type,label,icon,!disabled,!checked,radiogroup,!default",
    "summary^[HTMLElement]|",
];

/// Attribute names whose DOM property is spelled differently.
pub static ATTR_TO_PROP: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut map = HashMap::new();

    map.insert("class", "className");
    map.insert("for", "htmlFor");
    map.insert("formaction", "formAction");
    map.insert("innerHtml", "innerHTML");
    map.insert("readonly", "readOnly");
    map.insert("tabindex", "tabIndex");

    map.insert("aria-activedescendant", "ariaActiveDescendantElement");
    map.insert("aria-atomic", "ariaAtomic");
    map.insert("aria-autocomplete", "ariaAutoComplete");
    map.insert("aria-busy", "ariaBusy");
    map.insert("aria-checked", "ariaChecked");
    map.insert("aria-controls", "ariaControlsElements");
    map.insert("aria-current", "ariaCurrent");
    map.insert("aria-describedby", "ariaDescribedByElements");
    map.insert("aria-disabled", "ariaDisabled");
    map.insert("aria-expanded", "ariaExpanded");
    map.insert("aria-haspopup", "ariaHasPopup");
    map.insert("aria-hidden", "ariaHidden");
    map.insert("aria-invalid", "ariaInvalid");
    map.insert("aria-label", "ariaLabel");
    map.insert("aria-labelledby", "ariaLabelledByElements");
    map.insert("aria-level", "ariaLevel");
    map.insert("aria-live", "ariaLive");
    map.insert("aria-modal", "ariaModal");
    map.insert("aria-pressed", "ariaPressed");
    map.insert("aria-readonly", "ariaReadOnly");
    map.insert("aria-required", "ariaRequired");
    map.insert("aria-selected", "ariaSelected");
    map.insert("aria-valuemax", "ariaValueMax");
    map.insert("aria-valuemin", "ariaValueMin");
    map.insert("aria-valuenow", "ariaValueNow");
    map.insert("aria-valuetext", "ariaValueText");

    map
});

/// Registry decoded from [`SCHEMA`].
#[derive(Debug, Clone)]
pub struct DomElementSchemaRegistry {
    schema: HashMap<String, HashSet<String>>,
}

impl DomElementSchemaRegistry {
    pub fn new() -> Self {
        let mut schema: HashMap<String, HashSet<String>> = HashMap::new();

        for encoded_type in SCHEMA {
            let (str_type, str_properties) = match encoded_type.split_once('|') {
                Some(parts) => parts,
                None => continue,
            };
            let (type_names, super_name) = match str_type.split_once('^') {
                Some((names, parent)) => (names, Some(parent)),
                None => (str_type, None),
            };

            let mut properties: HashSet<String> = super_name
                .and_then(|parent| schema.get(&parent.to_lowercase()))
                .cloned()
                .unwrap_or_default();

            for property in str_properties.split(',').filter(|p| !p.is_empty()) {
                let name = property.trim_start_matches(&['!', '#', '%'][..]);
                properties.insert(name.to_string());
            }

            for tag in type_names.split(',') {
                schema.insert(tag.to_lowercase(), properties.clone());
            }
        }

        DomElementSchemaRegistry { schema }
    }

    fn properties_of(&self, tag_name: &str) -> Option<&HashSet<String>> {
        self.schema
            .get(&tag_name.to_lowercase())
            .or_else(|| self.schema.get("unknown"))
    }
}

impl Default for DomElementSchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementSchemaRegistry for DomElementSchemaRegistry {
    fn has_property(
        &self,
        tag_name: &str,
        prop_name: &str,
        schema_metas: &[SchemaMetadata],
    ) -> bool {
        if schema_metas.contains(&SchemaMetadata::NoErrors) {
            return true;
        }

        if tag_name.contains('-') {
            if is_ng_container(tag_name) || is_ng_content(tag_name) {
                return false;
            }
            if schema_metas.contains(&SchemaMetadata::CustomElements) {
                // The element's properties are only known once it is instantiated.
                return true;
            }
        }

        self.properties_of(tag_name)
            .map(|props| props.contains(prop_name))
            .unwrap_or(false)
    }

    fn has_element(&self, tag_name: &str, schema_metas: &[SchemaMetadata]) -> bool {
        if schema_metas.contains(&SchemaMetadata::NoErrors) {
            return true;
        }

        if tag_name.contains('-') {
            if is_ng_container(tag_name) || is_ng_content(tag_name) {
                return true;
            }
            if schema_metas.contains(&SchemaMetadata::CustomElements) {
                return true;
            }
        }

        let tag = tag_name.to_lowercase();
        tag != "unknown" && !tag.starts_with('[') && self.schema.contains_key(&tag)
    }

    fn all_known_element_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .schema
            .keys()
            .filter(|name| !name.starts_with('[') && name.as_str() != "unknown")
            .cloned()
            .collect();
        names.sort();
        names
    }

    fn get_mapped_prop_name(&self, prop_name: &str) -> String {
        ATTR_TO_PROP
            .get(prop_name)
            .copied()
            .unwrap_or(prop_name)
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_detect_elements() {
        let registry = DomElementSchemaRegistry::new();
        assert!(registry.has_element("div", &[]));
        assert!(registry.has_element("H1", &[]));
        assert!(registry.has_element("ng-container", &[]));
        assert!(!registry.has_element("unknown", &[]));
        assert!(!registry.has_element("my-cmp", &[]));
        assert!(registry.has_element("my-cmp", &[SchemaMetadata::CustomElements]));
        assert!(registry.has_element("abc", &[SchemaMetadata::NoErrors]));
    }

    #[test]
    fn should_detect_properties_with_inheritance() {
        let registry = DomElementSchemaRegistry::new();
        assert!(registry.has_property("div", "id", &[]));
        assert!(registry.has_property("div", "title", &[]));
        assert!(registry.has_property("input", "value", &[]));
        assert!(registry.has_property("input", "disabled", &[]));
        assert!(registry.has_property("video", "muted", &[]));
        assert!(!registry.has_property("div", "unknown", &[]));
        assert!(!registry.has_property("ng-container", "id", &[]));
    }

    #[test]
    fn should_fall_back_to_unknown_for_unlisted_tags() {
        let registry = DomElementSchemaRegistry::new();
        assert!(registry.has_property("my-cmp", "id", &[]));
        assert!(registry.has_property("my-cmp", "anything", &[SchemaMetadata::CustomElements]));
    }

    #[test]
    fn should_list_only_concrete_element_names() {
        let names = DomElementSchemaRegistry::new().all_known_element_names();
        assert!(names.contains(&"div".to_string()));
        assert!(names.contains(&"textarea".to_string()));
        assert!(!names.iter().any(|n| n.starts_with('[') || n.starts_with(':')));
        assert!(!names.contains(&"unknown".to_string()));
    }

    #[test]
    fn should_map_attribute_names_to_properties() {
        let registry = DomElementSchemaRegistry::new();
        assert_eq!(registry.get_mapped_prop_name("class"), "className");
        assert_eq!(registry.get_mapped_prop_name("for"), "htmlFor");
        assert_eq!(registry.get_mapped_prop_name("title"), "title");
    }
}
